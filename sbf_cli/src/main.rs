use std::fs::File;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Arg;
use sbf::{match_block, BlockRef, Framer, FramerEvent};

fn main() -> Result<()> {
    env_logger::init();

    let matches = clap::Command::new(clap::crate_name!())
        .about("Decodes an SBF byte stream and prints the blocks it contains")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("SBF log to decode; reads standard input when omitted"),
        )
        .get_matches();

    let mut data = Vec::new();
    match matches.get_one::<String>("file") {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("cannot open {path}"))?
                .read_to_end(&mut data)
                .with_context(|| format!("cannot read {path}"))?;
        },
        None => {
            io::stdin().lock().read_to_end(&mut data)?;
        },
    }

    let mut framer = Framer::new();
    let mut blocks = 0u32;
    let mut echoes = 0u32;
    for byte in &data {
        match framer.consume(*byte) {
            Some(Ok(FramerEvent::Block { block_id, payload })) => {
                blocks += 1;
                match match_block(block_id, payload) {
                    Ok(block) => print_block(&block),
                    Err(e) => log::warn!("malformed block {block_id}: {e}"),
                }
            },
            Some(Ok(FramerEvent::CommandEcho(line))) => {
                echoes += 1;
                println!("Echo: {}", String::from_utf8_lossy(line).trim());
            },
            Some(Err(e)) => log::debug!("dropped frame: {e}"),
            None => {},
        }
    }

    println!(
        "{} bytes, {blocks} blocks, {echoes} command echoes, {} checksum errors",
        data.len(),
        framer.crc_error_count()
    );
    Ok(())
}

fn print_block(block: &BlockRef<'_>) {
    match block {
        BlockRef::PvtGeodetic(pvt) => println!(
            "PVTGeodetic     tow={} wn={} mode={:#04x} lat={:.7} lon={:.7} h={:.3} nSV={}",
            pvt.tow(),
            pvt.wnc(),
            pvt.mode(),
            pvt.latitude().to_degrees(),
            pvt.longitude().to_degrees(),
            pvt.height(),
            pvt.nr_sv(),
        ),
        BlockRef::InsNavGeod(ins) => println!(
            "INSNavGeod      tow={} mode={:#04x} lat={:.7} lon={:.7} h={:.3} heading={:.2}",
            ins.tow(),
            ins.mode(),
            ins.latitude().to_degrees(),
            ins.longitude().to_degrees(),
            ins.height(),
            ins.heading(),
        ),
        BlockRef::AttEuler(att) => println!(
            "AttEuler        tow={} nSV={} heading={:.2} pitch={:.2} roll={:.2}",
            att.tow(),
            att.nr_sv(),
            att.heading(),
            att.pitch(),
            att.roll(),
        ),
        BlockRef::AttCovEuler(cov) => println!(
            "AttCovEuler     tow={} covHeadHead={:.4}",
            cov.tow(),
            cov.cov_head_head(),
        ),
        BlockRef::Dop(dop) => println!(
            "DOP             tow={} hDOP={:.2} vDOP={:.2} pDOP={:.2}",
            dop.tow(),
            f64::from(dop.hdop()) * 0.01,
            f64::from(dop.vdop()) * 0.01,
            f64::from(dop.pdop()) * 0.01,
        ),
        BlockRef::ReceiverStatus(rx) => println!(
            "ReceiverStatus  tow={} upTime={}s rxState={:#010x} rxError={:#010x}",
            rx.tow(),
            rx.up_time(),
            rx.rx_state(),
            rx.rx_error(),
        ),
        BlockRef::VelCovGeodetic(cov) => println!(
            "VelCovGeodetic  tow={} covVnVn={:.4} covVeVe={:.4} covVuVu={:.4}",
            cov.tow(),
            cov.cov_vn_vn(),
            cov.cov_ve_ve(),
            cov.cov_vu_vu(),
        ),
        BlockRef::Unknown(id) => println!("Unknown         id={id}"),
    }
}
