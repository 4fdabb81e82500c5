//! Load a cartridge image, bring the memory map up from its header and
//! trace the first N instructions with their mnemonics and timing.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dotmatrix_common::Word;
use dotmatrix_core::isa::{decoder, Prefix};
use dotmatrix_core::{Cpu, MemoryMap};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let rom_path: PathBuf = args.next().map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("Usage: dmg_trace <rom_path> [instruction_count]");
        std::process::exit(2);
    });
    let count: u32 = args
        .next()
        .unwrap_or_else(|| "32".to_string())
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Invalid instruction count; expected an integer.");
            std::process::exit(2);
        });

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM '{}'", rom_path.display()))?;

    let mut mmap = MemoryMap::new();
    mmap.initialize_with_rom(&rom)
        .into_result()
        .context("cartridge header rejected")?;

    // Entry point after the boot ROM hands over control.
    mmap.regs_mut().set_pc(Word::new(0x0100));
    let mut cpu = Cpu::new();

    for _ in 0..count {
        let pc = mmap.regs().pc().get();
        let mnemonic = mnemonic_at(&mmap, pc);

        let ticks = cpu.step(&mut mmap);
        if ticks == 0 {
            bail!("execution fault at 0x{pc:04X} ({mnemonic})");
        }
        println!("{pc:04X}  {mnemonic:<14} ; {ticks:>2} t-states");
    }

    Ok(())
}

/// Best-effort disassembly of the opcode at `address` for the trace line.
fn mnemonic_at(mmap: &MemoryMap, address: u16) -> String {
    let tables = decoder();
    let opcode = match mmap.read_byte_at(address).into_result() {
        Ok(byte) => byte.get(),
        Err(_) => return "??".to_string(),
    };

    if opcode == 0xCB {
        let sub = mmap
            .read_byte_at(address.wrapping_add(1))
            .into_result()
            .map(|byte| byte.get())
            .unwrap_or(0);
        return tables
            .table(Prefix::Cb)
            .lookup(sub)
            .map(|instruction| instruction.mnemonic().to_string())
            .unwrap_or_else(|| format!("db $cb, ${sub:02x}"));
    }

    tables
        .table(Prefix::None)
        .lookup(opcode)
        .map(|instruction| instruction.mnemonic().to_string())
        .unwrap_or_else(|| format!("db ${opcode:02x}"))
}
