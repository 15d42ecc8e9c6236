use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::{Elem, Id, Instruction, Variable, VariableKind};

/// Hands out fresh register ids. Clones share the same counter so child scopes never collide
/// with their parent.
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    next_id: Rc<Cell<Id>>,
}

impl Allocator {
    pub fn new_local_index(&self) -> Id {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub fn create_local(&self, elem: Elem) -> Variable {
        Variable::new(
            VariableKind::Local {
                id: self.new_local_index(),
            },
            elem,
        )
    }
}

/// The scope is the main [instruction](Instruction) and [variable](Variable) container that
/// simplifies the process of creating registers, shared arrays and registering new operations.
///
/// Every register is assigned exactly once, so the instruction list is in SSA form and can be
/// executed by all units of a cube in lockstep.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub instructions: Vec<Instruction>,
    shared_memories: Vec<Variable>,
    pub allocator: Allocator,
}

impl Scope {
    /// Create an empty scope with a fresh allocator.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a new register of the given element type.
    pub fn create_local(&mut self, elem: Elem) -> Variable {
        self.allocator.create_local(elem)
    }

    /// Create a shared array of `length` items of the given element type.
    pub fn create_shared(&mut self, elem: Elem, length: u32) -> Variable {
        let shared_memory = Variable::new(
            VariableKind::SharedArray {
                id: self.shared_memories.len() as Id,
                length,
            },
            elem,
        );
        self.shared_memories.push(shared_memory);
        shared_memory
    }

    /// Register an [instruction](Instruction) into the scope.
    pub fn register<T: Into<Instruction>>(&mut self, instruction: T) {
        self.instructions.push(instruction.into())
    }

    pub fn shared_memories(&self) -> &[Variable] {
        &self.shared_memories
    }

    /// Total shared memory requested by this scope, in bytes.
    pub fn shared_memory_size(&self) -> usize {
        self.shared_memories
            .iter()
            .map(|array| match array.kind {
                VariableKind::SharedArray { length, .. } => length as usize * array.elem.size(),
                _ => 0,
            })
            .sum()
    }
}
