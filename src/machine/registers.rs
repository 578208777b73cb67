//! Register file of the emulated CPU
//!
//! The debugger addresses registers by their MIPS32 ABI names (`$sp`, `$a0`,
//! ...) plus `$pc`. `$zero` is hard-wired: it always reads zero and writes to
//! it are dropped.

use super::constants::RESET_VECTOR;

/// ABI names of the 32 general purpose registers, by index
pub const GPR_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", //
    "t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", //
    "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", //
    "t8", "t9", "k0", "k1", "gp", "sp", "fp", "ra",
];

/// Either a general purpose register or the program counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterId {
    Gpr(usize),
    Pc,
}

impl RegisterId {
    /// Look up a register by ABI name (without the leading `$`)
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "pc" {
            return Some(RegisterId::Pc);
        }
        GPR_NAMES
            .iter()
            .position(|&n| n == name)
            .map(RegisterId::Gpr)
    }
}

/// CPU register state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    gpr: [u32; 32],
    pc: u32,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            gpr: [0; 32],
            pc: RESET_VECTOR,
        }
    }

    pub fn get(&self, id: RegisterId) -> u32 {
        match id {
            RegisterId::Gpr(0) => 0,
            RegisterId::Gpr(i) => self.gpr[i],
            RegisterId::Pc => self.pc,
        }
    }

    pub fn set(&mut self, id: RegisterId, value: u32) {
        match id {
            RegisterId::Gpr(0) => {}
            RegisterId::Gpr(i) => self.gpr[i] = value,
            RegisterId::Pc => self.pc = value,
        }
    }

    /// Value of the register called `name`, or `None` if there is no such register
    pub fn by_name(&self, name: &str) -> Option<u32> {
        RegisterId::from_name(name).map(|id| self.get(id))
    }

    /// Set the register called `name`. Returns false for unknown names.
    pub fn set_by_name(&mut self, name: &str, value: u32) -> bool {
        match RegisterId::from_name(name) {
            Some(id) => {
                self.set(id, value);
                true
            }
            None => false,
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(RegisterId::from_name("zero"), Some(RegisterId::Gpr(0)));
        assert_eq!(RegisterId::from_name("sp"), Some(RegisterId::Gpr(29)));
        assert_eq!(RegisterId::from_name("ra"), Some(RegisterId::Gpr(31)));
        assert_eq!(RegisterId::from_name("pc"), Some(RegisterId::Pc));
        assert_eq!(RegisterId::from_name("eax"), None);
        assert_eq!(RegisterId::from_name("$sp"), None);
    }

    #[test]
    fn test_zero_is_hardwired() {
        let mut regs = Registers::new();
        assert!(regs.set_by_name("zero", 7));
        assert_eq!(regs.by_name("zero"), Some(0));
    }

    #[test]
    fn test_set_and_get() {
        let mut regs = Registers::new();
        assert!(regs.set_by_name("t9", 0xffff_ffff));
        assert_eq!(regs.by_name("t9"), Some(0xffff_ffff));
        assert!(!regs.set_by_name("x99", 1));
        assert_eq!(regs.by_name("pc"), Some(RESET_VECTOR));
    }
}
