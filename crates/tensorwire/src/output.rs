use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tensorwire_frame::{verify_tag, Frame};
use tensorwire_message::{Message, TileKind};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Summary of one decoded frame.
#[derive(Debug)]
pub struct MessageReport {
    pub index: usize,
    pub message_type: u8,
    pub message_name: &'static str,
    pub fields: Vec<(&'static str, String)>,
    pub header_size: usize,
    pub payload_size: usize,
    pub checksum_tag: String,
    pub checksum: ChecksumStatus,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumStatus {
    /// The stored tag matches the body.
    Match,
    /// The stored tag does not match the body.
    Mismatch,
    /// The header has no room for a tag.
    Absent,
}

impl ChecksumStatus {
    fn as_str(self) -> &'static str {
        match self {
            ChecksumStatus::Match => "match",
            ChecksumStatus::Mismatch => "mismatch",
            ChecksumStatus::Absent => "absent",
        }
    }
}

impl MessageReport {
    pub fn new(index: usize, frame: &Frame, message: &Message) -> Self {
        let scalar_len = frame.header.len() - tag_len(message);
        let tag = &frame.header[scalar_len..];
        let checksum = if tag.is_empty() {
            ChecksumStatus::Absent
        } else if verify_tag(&frame.body, tag) {
            ChecksumStatus::Match
        } else {
            ChecksumStatus::Mismatch
        };

        Self {
            index,
            message_type: frame.message_type,
            message_name: message.message_type().name(),
            fields: message_fields(message),
            header_size: frame.header.len(),
            payload_size: frame.body.len(),
            checksum_tag: hex(tag),
            checksum,
        }
    }

    fn fields_summary(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn tag_len(message: &Message) -> usize {
    use tensorwire_message::WireMessage;

    match message {
        Message::Tile(_) => tensorwire_message::TileMessage::TAG_LEN,
        Message::Activation(_) => tensorwire_message::ActivationMessage::TAG_LEN,
        Message::Result(_) => tensorwire_message::ResultMessage::TAG_LEN,
    }
}

fn message_fields(message: &Message) -> Vec<(&'static str, String)> {
    match message {
        Message::Tile(tile) => vec![
            ("model_id", tile.model_id.to_string()),
            ("tile_id", tile.tile_id.to_string()),
            (
                "tile_kind",
                tile.kind()
                    .map(TileKind::name)
                    .map(str::to_string)
                    .unwrap_or_else(|| tile.tile_kind.to_string()),
            ),
            ("layer_idx", tile.layer_idx.to_string()),
            (
                "expert_idx",
                tile.expert()
                    .map(|idx| idx.to_string())
                    .unwrap_or_else(|| "none".to_string()),
            ),
        ],
        Message::Activation(act) => vec![
            ("session_id", act.session_id.to_string()),
            ("step_id", act.step_id.to_string()),
            ("from_tile_id", act.from_tile_id.to_string()),
            ("to_tile_id", act.to_tile_id.to_string()),
        ],
        Message::Result(res) => vec![
            ("session_id", res.session_id.to_string()),
            ("step_id", res.step_id.to_string()),
            ("tile_id", res.tile_id.to_string()),
            ("vote_group", res.vote_group.to_string()),
            ("cycles_hint", res.cycles_hint.to_string()),
        ],
    }
}

/// Writes reports as frames are decoded. Only the table is held back, since
/// its column widths depend on every row; payloads are never retained.
pub struct ReportSink<W: Write> {
    out: W,
    format: OutputFormat,
    table: Option<Table>,
}

impl<W: Write> ReportSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        let table = matches!(format, OutputFormat::Table).then(|| {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "TYPE", "FIELDS", "PAYLOAD", "TAG", "CHECKSUM"]);
            table
        });
        Self { out, format, table }
    }

    pub fn emit(&mut self, report: &MessageReport, payload: &[u8]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let line = serde_json::to_string(&json_report(report))
                    .unwrap_or_else(|_| "{}".to_string());
                writeln!(self.out, "{line}")?;
            }
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    table.add_row(vec![
                        report.index.to_string(),
                        report.message_name.to_string(),
                        report.fields_summary(),
                        report.payload_size.to_string(),
                        report.checksum_tag.clone(),
                        report.checksum.as_str().to_string(),
                    ]);
                }
                return Ok(());
            }
            OutputFormat::Pretty => writeln!(
                self.out,
                "#{} {} {} payload={} tag={} checksum={}",
                report.index,
                report.message_name,
                report.fields_summary(),
                report.payload_size,
                report.checksum_tag,
                report.checksum.as_str()
            )?,
            OutputFormat::Raw => self.out.write_all(payload)?,
        }
        self.out.flush()
    }

    /// Print the table, if any, and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(table) = self.table.take() {
            writeln!(self.out, "{table}")?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

fn json_report(report: &MessageReport) -> serde_json::Value {
    let fields: serde_json::Map<String, serde_json::Value> = report
        .fields
        .iter()
        .map(|(name, value)| {
            let value = value
                .parse::<u64>()
                .map(serde_json::Value::from)
                .unwrap_or_else(|_| serde_json::Value::from(value.as_str()));
            (name.to_string(), value)
        })
        .collect();

    serde_json::json!({
        "index": report.index,
        "message_type": report.message_type,
        "message_name": report.message_name,
        "fields": fields,
        "header_size": report.header_size,
        "payload_size": report.payload_size,
        "checksum_tag": report.checksum_tag,
        "checksum": report.checksum,
    })
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
