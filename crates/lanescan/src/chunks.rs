use lanescan_layout::ScanGeometry;

/// How the registers of a unit split into chunks of axis-contiguous elements.
///
/// Registers follow the layout order: the elements of one repetition of the unit tile first,
/// then the repetitions. The elements of a chunk are `element_stride` registers apart and the
/// chunk tail, its last element along the axis, comes last in register order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    num_registers: usize,
    elements_per_chunk: usize,
    element_stride: usize,
    parallel_elements: usize,
    block_stride: usize,
    axis_blocks: usize,
}

/// The last register of a chunk, where the chunk's running value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTail {
    /// Position of the chunk among the tails, in register order.
    pub chunk: usize,
    /// Register holding the tail.
    pub register: usize,
    /// Tile repetition along the axis the chunk belongs to.
    pub axis_block: usize,
    /// Accumulator shared by all chunks of the same scan line, across axis repetitions.
    pub accumulator: usize,
}

impl ChunkLayout {
    /// # Panics
    ///
    /// If the registers don't factor into axis chunks, axis repetitions, parallel elements and
    /// parallel repetitions.
    pub fn new(geometry: &ScanGeometry) -> Self {
        let layout = Self {
            num_registers: geometry.total_elements_per_thread as usize,
            elements_per_chunk: geometry.axis_num_elements_per_thread as usize,
            element_stride: geometry.axis_element_stride as usize,
            parallel_elements: geometry.non_axis_num_elements_per_thread as usize,
            block_stride: geometry.axis_block_stride as usize,
            axis_blocks: geometry.axis_num_blocks as usize,
        };

        let factored = layout.elements_per_chunk
            * layout.axis_blocks
            * layout.parallel_elements
            * geometry.non_axis_num_blocks as usize;
        assert_eq!(
            factored, layout.num_registers,
            "Registers must factor into chunks and tile repetitions"
        );

        layout
    }

    pub fn num_registers(&self) -> usize {
        self.num_registers
    }

    pub fn num_chunks(&self) -> usize {
        self.num_registers / self.elements_per_chunk
    }

    pub fn elements_per_chunk(&self) -> usize {
        self.elements_per_chunk
    }

    pub fn axis_blocks(&self) -> usize {
        self.axis_blocks
    }

    /// Number of scan lines crossing a unit, one accumulator each.
    pub fn num_accumulators(&self) -> usize {
        self.num_chunks() / self.axis_blocks
    }

    /// Index of the chunk holding `register`.
    pub fn chunk_of(&self, register: usize) -> usize {
        register % self.element_stride
            + (register / self.element_stride / self.elements_per_chunk) * self.element_stride
    }

    /// Position of `register` inside its chunk, along the axis.
    pub fn position_in_chunk(&self, register: usize) -> usize {
        (register / self.element_stride) % self.elements_per_chunk
    }

    pub fn is_tail(&self, register: usize) -> bool {
        self.position_in_chunk(register) == self.elements_per_chunk - 1
    }

    /// Every chunk tail, in register order.
    pub fn tails(&self) -> impl Iterator<Item = ChunkTail> + '_ {
        (0..self.num_registers)
            .filter(|register| self.is_tail(*register))
            .enumerate()
            .map(|(chunk, register)| {
                let block = chunk / self.parallel_elements;
                let parallel_block = block % self.block_stride
                    + (block / self.block_stride / self.axis_blocks) * self.block_stride;

                ChunkTail {
                    chunk,
                    register,
                    axis_block: (block / self.block_stride) % self.axis_blocks,
                    accumulator: chunk % self.parallel_elements
                        + parallel_block * self.parallel_elements,
                }
            })
    }

    /// The other registers of the chunk ending at `tail`, nearest first.
    pub fn interior(&self, tail: &ChunkTail) -> impl Iterator<Item = usize> {
        let (register, stride) = (tail.register, self.element_stride);
        (1..self.elements_per_chunk).map(move |i| register - i * stride)
    }
}
