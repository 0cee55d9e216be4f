use crate::error::ScanError;
use crate::export::{export_value, prompt_note};
use crate::host::{ChatHost, Message, MemoryHost};
use crate::options::{BondFloor, Options, UnboundedMeter};
use crate::session::{Session, Trigger, Validity};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};

fn print_help(program: &str) {
    eprintln!(
        "Usage: {prog} [OPTIONS] [INPUT]\n\
         \n\
         INPUT: chat transcript (JSON array or JSON lines of {{\"is_user\", \"mes\"}}\n\
         records). When omitted, reads from stdin.\n\
         \n\
         Options:\n\
           -o, --output FILE         Write output to FILE (default stdout)\n\
               --text                Treat INPUT as a single agent message\n\
               --pretty              Pretty-print the state\n\
               --diagnose            Print status and parse diagnostics instead of state\n\
               --write-back          Rewrite the tagged block and print the transcript\n\
               --in-place            Like --write-back, overwriting INPUT\n\
               --roster              Print the character picker\n\
               --viewer NAME         Display name substituted for {{{{user}}}}\n\
               --note                Print the prompt note for the current state\n\
               --repair-log          Report repair rules that fired on stderr\n\
               --bond-floor POLICY   unbounded|zero (default unbounded)\n\
               --hide-unbounded      Hide meters with an infinite maximum\n\
           -h, --help                Show this help\n",
        prog = program
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Array,
    Lines,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    State,
    Diagnose,
    WriteBack,
    Roster,
    Note,
}

struct CliMode {
    input: Option<String>,
    output: Option<String>,
    in_place: bool,
    text: bool,
    pretty: bool,
    action: Action,
    viewer: Option<String>,
}

fn missing(what: &str, flag: &str) -> ! {
    eprintln!("Missing {} for {}", what, flag);
    std::process::exit(2);
}

fn parse_args() -> (Options, CliMode) {
    let mut args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "rpgstate".to_string());
    args.remove(0);

    let mut opts = Options::default();
    let mut mode = CliMode {
        input: None,
        output: None,
        in_place: false,
        text: false,
        pretty: false,
        action: Action::State,
        viewer: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help(&program);
                std::process::exit(0);
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    missing("FILE", "--output");
                }
                mode.output = Some(args[i].clone());
            }
            "--text" => mode.text = true,
            "--pretty" => mode.pretty = true,
            "--diagnose" => mode.action = Action::Diagnose,
            "--write-back" => mode.action = Action::WriteBack,
            "--in-place" => {
                mode.in_place = true;
                mode.action = Action::WriteBack;
            }
            "--roster" => mode.action = Action::Roster,
            "--viewer" => {
                i += 1;
                if i >= args.len() {
                    missing("NAME", "--viewer");
                }
                mode.viewer = Some(args[i].clone());
            }
            "--note" => mode.action = Action::Note,
            "--repair-log" => opts.logging = true,
            "--bond-floor" => {
                i += 1;
                if i >= args.len() {
                    missing("POLICY", "--bond-floor");
                }
                opts.bond_floor = match args[i].to_lowercase().as_str() {
                    "unbounded" => BondFloor::Unbounded,
                    "zero" => BondFloor::Zero,
                    other => {
                        eprintln!("Unknown bond-floor policy: {}", other);
                        std::process::exit(2);
                    }
                };
            }
            "--hide-unbounded" => opts.unbounded_meter = UnboundedMeter::Hidden,
            s if s.starts_with('-') => {
                eprintln!("Unknown option: {}", s);
                std::process::exit(2);
            }
            path => {
                mode.input = Some(path.to_string());
            }
        }
        i += 1;
    }
    if mode.in_place && mode.action != Action::WriteBack {
        eprintln!("--in-place only applies to --write-back");
        std::process::exit(2);
    }
    (opts, mode)
}

/// Reads a transcript: a JSON array of messages, or one message per line.
fn read_transcript(content: &str) -> Result<(Vec<Message>, Format), Box<dyn std::error::Error>> {
    if content.trim_start().starts_with('[') {
        return Ok((serde_json::from_str(content)?, Format::Array));
    }
    let mut messages = Vec::new();
    for (n, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let msg = serde_json::from_str(line)
            .map_err(|e| format!("line {}: not a chat message: {}", n + 1, e))?;
        messages.push(msg);
    }
    Ok((messages, Format::Lines))
}

fn write_transcript(messages: &[Message], format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Array => serde_json::to_string_pretty(messages),
        Format::Lines => {
            let mut out = String::new();
            for m in messages {
                out.push_str(&serde_json::to_string(m)?);
                out.push('\n');
            }
            Ok(out)
        }
        Format::Text => Ok(messages
            .first()
            .and_then(|m| m.text())
            .unwrap_or_default()
            .to_string()),
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (opts, mode) = parse_args();

    let content = match &mode.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            s
        }
    };
    let (messages, format) = if mode.text {
        (vec![Message::agent(&content)], Format::Text)
    } else {
        read_transcript(&content)?
    };
    tracing::debug!(messages = messages.len(), ?format, "transcript loaded");

    let mut host = MemoryHost::new(messages);
    host.viewer = mode.viewer.clone();
    let mut session = Session::new(opts);
    let trigger = match mode.action {
        Action::WriteBack => Trigger::Manual,
        _ => Trigger::Auto,
    };
    let scanned = session.scan(&mut host, trigger);

    if let Ok(report) = &scanned {
        for entry in &report.repair_log {
            eprintln!("repair @{}: {} [{}]", entry.position, entry.message, entry.context);
        }
    }

    let rendered = match mode.action {
        Action::Diagnose => {
            let status = session.refresh_status(host.messages());
            let mut out = format!("status: {}\n", status.validity.label());
            if let Validity::Invalid(msg) = &status.validity {
                out.push_str(&format!("latest: {}\n", msg));
            }
            match &scanned {
                Ok(r) if r.repaired => out.push_str("scan: ok after repair\n"),
                Ok(_) => out.push_str("scan: ok\n"),
                Err(e) => out.push_str(&format!("scan: {}\n", e)),
            }
            if let Some(d) = session.last_error() {
                out.push('\n');
                out.push_str(&d.to_string());
            }
            out
        }
        _ => {
            if let Err(err) = &scanned {
                if let ScanError::Parse(d) = err {
                    eprint!("{}", d);
                }
                return Err(err.clone().into());
            }
            match mode.action {
                Action::WriteBack => write_transcript(host.messages(), format)?,
                Action::Roster => {
                    let mut out = String::new();
                    for e in session.roster(host.viewer.as_deref()) {
                        out.push_str(&format!("{}\t{}\t{}\n", e.index, e.kind.as_str(), e.label));
                    }
                    out
                }
                Action::Note => prompt_note(session.state())?,
                _ => {
                    let v = export_value(session.state())?;
                    let mut s = if mode.pretty {
                        serde_json::to_string_pretty(&v)?
                    } else {
                        serde_json::to_string(&v)?
                    };
                    s.push('\n');
                    s
                }
            }
        }
    };

    if mode.in_place {
        let path = mode
            .input
            .as_ref()
            .ok_or("--in-place requires INPUT file")?;
        fs::write(path, rendered)?;
        return Ok(());
    }

    let mut out_writer: Box<dyn Write> = if let Some(ref o) = mode.output {
        Box::new(BufWriter::new(File::create(o)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };
    out_writer.write_all(rendered.as_bytes())?;
    out_writer.flush()?;
    Ok(())
}
