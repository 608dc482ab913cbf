use serde::Serialize;
use tensorwire_message::{ActivationMessage, ResultMessage, TileMessage, WireMessage};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

/// Fixed header layout of one message type, as this build encodes it.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MessageLayout {
    pub name: &'static str,
    pub message_type: u8,
    pub header_len: usize,
    pub scalar_len: usize,
    pub tag_len: usize,
}

impl MessageLayout {
    fn of<M: WireMessage>() -> Self {
        Self {
            name: M::MESSAGE_TYPE.name(),
            message_type: M::MESSAGE_TYPE.as_u8(),
            header_len: M::HEADER_LEN,
            scalar_len: M::SCALAR_LEN,
            tag_len: M::TAG_LEN,
        }
    }
}

pub fn message_layouts() -> [MessageLayout; 3] {
    [
        MessageLayout::of::<TileMessage>(),
        MessageLayout::of::<ActivationMessage>(),
        MessageLayout::of::<ResultMessage>(),
    ]
}

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("tensorwire {}", env!("CARGO_PKG_VERSION"));
    if args.extended {
        println!("wire v{}", tensorwire_frame::VERSION);
        for layout in message_layouts() {
            println!(
                "  {:<10} type={} header={} ({} scalar + {} tag)",
                layout.name,
                layout.message_type,
                layout.header_len,
                layout.scalar_len,
                layout.tag_len
            );
        }
    }
    Ok(SUCCESS)
}
