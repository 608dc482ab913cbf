use std::fs::{self, File};
use std::io::{self, Write};

use tensorwire_frame::FrameWriter;
use tensorwire_message::{write_message, ActivationMessage, Message, ResultMessage, TileMessage};

use crate::cmd::{EncodeArgs, EncodeMessage, OutputArgs};
use crate::exit::{io_error, message_error, CliResult, SUCCESS};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let (message, output) = build_message(args.message)?;

    if let Message::Result(result) = &message {
        if !result.has_valid_vote_group() {
            tracing::warn!(vote_group = result.vote_group, "vote group outside 0..3");
        }
    }

    let sink: Box<dyn Write> = match &output.out {
        Some(path) => Box::new(File::create(path).map_err(|err| {
            io_error(&format!("failed creating {}", path.display()), err)
        })?),
        None => Box::new(io::stdout().lock()),
    };

    let mut writer = FrameWriter::new(sink);
    write_message(&mut writer, &message).map_err(|err| message_error("encode failed", err))?;
    tracing::info!(
        message_type = %message.message_type(),
        payload_len = message.payload().len(),
        "wrote frame"
    );

    Ok(SUCCESS)
}

fn build_message(message: EncodeMessage) -> CliResult<(Message, OutputArgs)> {
    let built = match message {
        EncodeMessage::Tile(args) => {
            let payload = resolve_payload(&args.output)?;
            let tile = TileMessage::new(
                args.model_id,
                args.tile_id,
                args.kind.into(),
                args.layer,
                args.expert,
                payload,
            );
            (tile.into(), args.output)
        }
        EncodeMessage::Activation(args) => {
            let payload = resolve_payload(&args.output)?;
            let act = ActivationMessage::new(
                args.session_id,
                args.step_id,
                args.from_tile_id,
                args.to_tile_id,
                payload,
            );
            (act.into(), args.output)
        }
        EncodeMessage::Result(args) => {
            let payload = resolve_payload(&args.output)?;
            let result = ResultMessage::new(
                args.session_id,
                args.step_id,
                args.tile_id,
                args.vote_group,
                payload,
            )
            .with_cycles_hint(args.cycles_hint);
            (result.into(), args.output)
        }
    };
    Ok(built)
}

fn resolve_payload(args: &OutputArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    if let Some(len) = args.zeros {
        return Ok(vec![0u8; len]);
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{ResultArgs, TileArgs, TileKindArg};
    use tensorwire_message::{TileKind, NO_EXPERT};

    fn output(data: Option<&str>, zeros: Option<usize>) -> OutputArgs {
        OutputArgs {
            data: data.map(str::to_string),
            file: None,
            zeros,
            out: None,
        }
    }

    #[test]
    fn builds_tile_with_zero_payload() {
        let (message, _) = build_message(EncodeMessage::Tile(TileArgs {
            model_id: 1,
            tile_id: 2,
            kind: TileKindArg::Weight,
            layer: 3,
            expert: None,
            output: output(None, Some(100)),
        }))
        .unwrap();

        match message {
            Message::Tile(tile) => {
                assert_eq!(tile.tile_id, 2);
                assert_eq!(tile.kind(), Some(TileKind::Weight));
                assert_eq!(tile.expert_idx, NO_EXPERT);
                assert_eq!(tile.tile_bytes.len(), 100);
            }
            other => panic!("expected tile, got {other:?}"),
        }
    }

    #[test]
    fn builds_result_with_cycles_hint() {
        let (message, _) = build_message(EncodeMessage::Result(ResultArgs {
            session_id: 1,
            step_id: 2,
            tile_id: 3,
            vote_group: 1,
            cycles_hint: 999,
            output: output(Some("partial"), None),
        }))
        .unwrap();

        match message {
            Message::Result(result) => {
                assert_eq!(result.cycles_hint, 999);
                assert_eq!(result.vote_group, 1);
                assert_eq!(result.payload.as_ref(), b"partial");
            }
            other => panic!("expected result, got {other:?}"),
        }
    }

    #[test]
    fn empty_payload_by_default() {
        assert!(resolve_payload(&output(None, None)).unwrap().is_empty());
    }
}
