//! File compression demo driver.
//!
//! Feeds whole files through the adaptive or static container codec:
//!
//! ```text
//! rcodec encode        <in> <out>    adaptive compress
//! rcodec decode        <in> <out>    adaptive decompress
//! rcodec encode-static <in> <out>    static compress (histogram header)
//! rcodec decode-static <in> <out>    static decompress
//! ```

use std::{env, fs, process};

use rangecoder::codec;

fn usage(program: &str) -> ! {
    eprintln!("usage: {program} encode|decode|encode-static|decode-static <in> <out>");
    process::exit(2);
}

fn run(mode: &str, input: &str, output: &str) -> rangecoder::Result<bool> {
    let data = fs::read(input)?;
    let transformed = match mode {
        "encode" => codec::adaptive_compress(&data)?,
        "decode" => codec::adaptive_decompress(&data)?,
        "encode-static" => codec::static_compress(&data)?,
        "decode-static" => codec::static_decompress(&data)?,
        _ => return Ok(false),
    };
    fs::write(output, transformed)?;
    Ok(true)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("rcodec");
    if args.len() != 4 {
        usage(program);
    }

    match run(&args[1], &args[2], &args[3]) {
        Ok(true) => {}
        Ok(false) => usage(program),
        Err(err) => {
            eprintln!("{program}: {err}");
            process::exit(1);
        }
    }
}
