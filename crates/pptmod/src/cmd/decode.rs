use std::fs::File;
use std::io::Read;
use std::path::Path;

use pptmod_frame::{DecodeObserver, FrameDecoder, FrameReader, ReadError, TracingObserver};

use crate::cmd::{DecodeArgs, RunContext};
use crate::exit::{
    decode_error, io_error, read_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE,
};
use crate::output::print_frame;

pub fn run(args: DecodeArgs, ctx: &RunContext) -> CliResult<i32> {
    let table = args.table.load()?;
    let decoder = FrameDecoder::new(&table);
    let mut observer = ctx.trace_fields.then_some(TracingObserver);

    if let Some(text) = &args.hex {
        let buf = parse_hex(text)?;
        decode_and_print(&decoder, &buf, 1, ctx, observer.as_mut())?;
        return Ok(SUCCESS);
    }

    let input = open_input(args.input.as_deref())?;
    let mut reader = FrameReader::new(input);

    loop {
        if args.count.is_some_and(|limit| reader.frames_read() >= limit) {
            break;
        }
        match reader.read_frame() {
            Ok(frame) => {
                let index = reader.frames_read();
                decode_and_print(&decoder, &frame, index, ctx, observer.as_mut())?;
            }
            Err(ReadError::Closed) => break,
            Err(ReadError::Truncated { buffered }) if args.skip_truncated => {
                tracing::warn!(buffered, "ignoring trailing partial frame");
                break;
            }
            Err(err) => return Err(read_error("read failed", err)),
        }
    }

    if reader.frames_read() == 0 {
        return Err(CliError::new(DATA_INVALID, "input holds no complete frame"));
    }
    tracing::info!(frames = reader.frames_read(), "decode finished");
    Ok(SUCCESS)
}

fn decode_and_print(
    decoder: &FrameDecoder<'_>,
    buf: &[u8],
    index: u64,
    ctx: &RunContext,
    observer: Option<&mut TracingObserver>,
) -> CliResult<()> {
    let decoded = decoder
        .decode(buf)
        .map_err(|err| decode_error(&format!("frame {index}"), err))?;
    if let Some(observer) = observer {
        observer.on_frame(&decoded);
    }
    print_frame(&decoded, index, ctx.format);
    Ok(())
}

fn open_input(path: Option<&Path>) -> CliResult<Box<dyn Read>> {
    match path {
        None => Ok(Box::new(std::io::stdin().lock())),
        Some(path) if path.as_os_str() == "-" => Ok(Box::new(std::io::stdin().lock())),
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Ok(Box::new(file))
        }
    }
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&cleaned).map_err(|err| CliError::new(USAGE, format!("--hex is not valid hex: {err}")))
}
