use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tensorwire_frame::{FrameConfig, FrameError, FrameReader};
use tensorwire_message::{DecodeOptions, Message};

use crate::cmd::InspectArgs;
use crate::exit::{frame_error, io_error, message_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{MessageReport, OutputFormat, ReportSink};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let input = open_input(args.path.as_deref())?;
    let config = FrameConfig {
        max_body_size: args.max_body,
    };
    let options = DecodeOptions {
        verify_checksum: args.verify,
    };
    let mut reader = FrameReader::with_config(input, config);
    let mut sink = ReportSink::new(io::stdout().lock(), format);

    // Reports already emitted stay on stdout when a later frame fails.
    let decoded = inspect_frames(&mut reader, &mut sink, &options, args.count);
    let finished = sink.finish();
    let count = decoded?;
    finished.map_err(|err| io_error("failed writing reports", err))?;

    if count == 0 {
        tracing::warn!("input contained no frames");
    }
    Ok(SUCCESS)
}

fn inspect_frames<R: Read, W: Write>(
    reader: &mut FrameReader<R>,
    sink: &mut ReportSink<W>,
    options: &DecodeOptions,
    limit: Option<usize>,
) -> CliResult<usize> {
    let mut index = 0;
    while limit.is_none_or(|limit| index < limit) {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) if reader.is_idle() => break,
            Err(FrameError::ConnectionClosed) => {
                return Err(CliError::new(
                    DATA_INVALID,
                    format!("frame {index}: input ends mid-frame"),
                ));
            }
            Err(err) => return Err(frame_error(&format!("frame {index}"), err)),
        };

        let message = Message::from_frame_with(&frame, options)
            .map_err(|err| message_error(&format!("frame {index}"), err))?;
        tracing::debug!(
            index,
            message_type = frame.message_type,
            body_len = frame.body.len(),
            "decoded message"
        );

        sink.emit(&MessageReport::new(index, &frame, &message), &frame.body)
            .map_err(|err| io_error("failed writing reports", err))?;
        index += 1;
    }
    Ok(index)
}

fn open_input(path: Option<&Path>) -> CliResult<Box<dyn Read>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}
