//! Instruction decoding.
//!
//! A 16-bit instruction word is converted into an [`Instr`], a tagged
//! variant with one constructor per opcode (decoded once, then matched by
//! the step loop) rather than re-extracting bit fields at execution time.
//!
//! Bit ranges below are MSB..LSB inclusive, as in the ISA reference.

use crate::bits::{extract_field, sign_extend};
use crate::error::VmError;

fn opcode(instr: u16) -> u8 {
    extract_field(instr, 15, 12) as u8
}

fn dr(instr: u16) -> u8 {
    extract_field(instr, 11, 9) as u8
}

fn sr(instr: u16) -> u8 {
    extract_field(instr, 8, 6) as u8
}

fn sr1(instr: u16) -> u8 {
    extract_field(instr, 8, 6) as u8
}

fn sr2(instr: u16) -> u8 {
    extract_field(instr, 2, 0) as u8
}

fn base_r(instr: u16) -> u8 {
    extract_field(instr, 8, 6) as u8
}

fn imm_flag(instr: u16) -> bool {
    extract_field(instr, 5, 5) != 0
}

fn imm5(instr: u16) -> u16 {
    sign_extend(extract_field(instr, 4, 0), 5)
}

fn offset6(instr: u16) -> u16 {
    sign_extend(extract_field(instr, 5, 0), 6)
}

fn offset9(instr: u16) -> u16 {
    sign_extend(extract_field(instr, 8, 0), 9)
}

fn offset11(instr: u16) -> u16 {
    sign_extend(extract_field(instr, 10, 0), 11)
}

fn trap_vector(instr: u16) -> u8 {
    extract_field(instr, 7, 0) as u8
}

/// A decoded, ready-to-execute instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Br {
        n: bool,
        z: bool,
        p: bool,
        offset9: u16,
    },
    AddReg {
        dr: u8,
        sr1: u8,
        sr2: u8,
    },
    AddImm {
        dr: u8,
        sr1: u8,
        imm5: u16,
    },
    Ld {
        dr: u8,
        offset9: u16,
    },
    St {
        sr: u8,
        offset9: u16,
    },
    JsrImm {
        offset11: u16,
    },
    JsrReg {
        base_r: u8,
    },
    AndReg {
        dr: u8,
        sr1: u8,
        sr2: u8,
    },
    AndImm {
        dr: u8,
        sr1: u8,
        imm5: u16,
    },
    Ldr {
        dr: u8,
        base_r: u8,
        offset6: u16,
    },
    Str {
        sr: u8,
        base_r: u8,
        offset6: u16,
    },
    Not {
        dr: u8,
        sr: u8,
    },
    Ldi {
        dr: u8,
        offset9: u16,
    },
    Sti {
        sr: u8,
        offset9: u16,
    },
    Jmp {
        base_r: u8,
    },
    Lea {
        dr: u8,
        offset9: u16,
    },
    Trap {
        vector: u8,
    },
}

/// Decode a 16-bit instruction word.
///
/// Returns `VmError::IllegalOpcode` for `RTI` (0b1000) and the reserved
/// opcode `RES` (0b1101); every other opcode always decodes successfully
/// (unknown TRAP vectors are validated later, at dispatch time, since the
/// vector space is not fully enumerated by the opcode alone).
pub fn decode(instr: u16) -> Result<Instr, VmError> {
    match opcode(instr) {
        0b0000 => Ok(Instr::Br {
            n: extract_field(instr, 11, 11) != 0,
            z: extract_field(instr, 10, 10) != 0,
            p: extract_field(instr, 9, 9) != 0,
            offset9: offset9(instr),
        }),
        0b0001 => {
            if imm_flag(instr) {
                Ok(Instr::AddImm {
                    dr: dr(instr),
                    sr1: sr1(instr),
                    imm5: imm5(instr),
                })
            } else {
                Ok(Instr::AddReg {
                    dr: dr(instr),
                    sr1: sr1(instr),
                    sr2: sr2(instr),
                })
            }
        }
        0b0010 => Ok(Instr::Ld {
            dr: dr(instr),
            offset9: offset9(instr),
        }),
        0b0011 => Ok(Instr::St {
            sr: dr(instr),
            offset9: offset9(instr),
        }),
        0b0100 => {
            if extract_field(instr, 11, 11) != 0 {
                Ok(Instr::JsrImm {
                    offset11: offset11(instr),
                })
            } else {
                Ok(Instr::JsrReg {
                    base_r: base_r(instr),
                })
            }
        }
        0b0101 => {
            if imm_flag(instr) {
                Ok(Instr::AndImm {
                    dr: dr(instr),
                    sr1: sr1(instr),
                    imm5: imm5(instr),
                })
            } else {
                Ok(Instr::AndReg {
                    dr: dr(instr),
                    sr1: sr1(instr),
                    sr2: sr2(instr),
                })
            }
        }
        0b0110 => Ok(Instr::Ldr {
            dr: dr(instr),
            base_r: base_r(instr),
            offset6: offset6(instr),
        }),
        0b0111 => Ok(Instr::Str {
            sr: dr(instr),
            base_r: base_r(instr),
            offset6: offset6(instr),
        }),
        0b1000 => Err(VmError::IllegalOpcode(instr)),
        0b1001 => Ok(Instr::Not {
            dr: dr(instr),
            sr: sr(instr),
        }),
        0b1010 => Ok(Instr::Ldi {
            dr: dr(instr),
            offset9: offset9(instr),
        }),
        0b1011 => Ok(Instr::Sti {
            sr: dr(instr),
            offset9: offset9(instr),
        }),
        0b1100 => Ok(Instr::Jmp {
            base_r: base_r(instr),
        }),
        0b1101 => Err(VmError::IllegalOpcode(instr)),
        0b1110 => Ok(Instr::Lea {
            dr: dr(instr),
            offset9: offset9(instr),
        }),
        0b1111 => Ok(Instr::Trap {
            vector: trap_vector(instr),
        }),
        _ => unreachable!("opcode is a 4-bit field, all 16 values are handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_add_register_mode() {
        // ADD R0, R1, R2
        let instr = 0x1042;
        assert_eq!(
            decode(instr).unwrap(),
            Instr::AddReg {
                dr: 0,
                sr1: 1,
                sr2: 2
            }
        );
    }

    #[test]
    fn decode_add_immediate_mode() {
        // ADD R0, R1, #2
        let instr = 0x1062;
        assert_eq!(
            decode(instr).unwrap(),
            Instr::AddImm {
                dr: 0,
                sr1: 1,
                imm5: 2
            }
        );
    }

    #[test]
    fn decode_and_register_mode() {
        let instr = 0x5042;
        assert_eq!(
            decode(instr).unwrap(),
            Instr::AndReg {
                dr: 0,
                sr1: 1,
                sr2: 2
            }
        );
    }

    #[test]
    fn decode_not() {
        let instr = 0x903F;
        assert_eq!(decode(instr).unwrap(), Instr::Not { dr: 0, sr: 1 });
    }

    #[test]
    fn decode_ldi() {
        let instr = 0xA001;
        assert_eq!(
            decode(instr).unwrap(),
            Instr::Ldi {
                dr: 0,
                offset9: 1
            }
        );
    }

    #[test]
    fn decode_br_taken_flags_and_offset() {
        // BRz +3
        let instr = 0x0403;
        assert_eq!(
            decode(instr).unwrap(),
            Instr::Br {
                n: false,
                z: true,
                p: false,
                offset9: 3
            }
        );
    }

    #[test]
    fn decode_trap_halt() {
        let instr = 0xF025;
        assert_eq!(decode(instr).unwrap(), Instr::Trap { vector: 0x25 });
    }

    #[test]
    fn decode_rti_is_illegal() {
        let instr = 0x8000;
        assert!(matches!(decode(instr), Err(VmError::IllegalOpcode(0x8000))));
    }

    #[test]
    fn decode_res_is_illegal() {
        let instr = 0xD000;
        assert!(matches!(decode(instr), Err(VmError::IllegalOpcode(0xD000))));
    }

    #[test]
    fn decode_jsr_immediate_and_register_modes() {
        // JSR (bit 11 = 1)
        let instr = 0x4800 | 0x001;
        assert_eq!(decode(instr).unwrap(), Instr::JsrImm { offset11: 1 });
        // JSRR (bit 11 = 0), BaseR = R2
        let instr = 0x4080;
        assert_eq!(decode(instr).unwrap(), Instr::JsrReg { base_r: 2 });
    }

    #[test]
    fn negative_offsets_sign_extend_correctly() {
        // LD R0, #-1 (offset9 = 0x1ff, all ones)
        let instr = 0x21FF;
        assert_eq!(
            decode(instr).unwrap(),
            Instr::Ld {
                dr: 0,
                offset9: 0xffff
            }
        );
    }
}
