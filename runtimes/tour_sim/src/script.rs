// Script commands for the headless tour simulator
//
// A script is a list of commands separated by `;` or newlines, e.g.
// `detail 0; look 80 1.0; free 1; move 0 1 2.0; status`.

use anyhow::{Context, Result, anyhow, bail};
use exhibit_tour::input::Handedness;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Re-run tour startup
    Start,
    Detail(usize),
    Wide(usize),
    FreeRoam(usize),
    ReturnToMain,
    /// Idle for a number of seconds
    Tick(f32),
    /// Pitch the head (degrees, positive is up) and hold it for a number of seconds
    Look { pitch: f32, seconds: f32 },
    /// Push the left stick and hold it
    Move { x: f32, y: f32, seconds: f32 },
    /// Hold the up or down button
    Vertical { up: bool, seconds: f32 },
    /// One snap turn to the right
    SnapTurn,
    Grab(Handedness),
    /// Hold the grabbing hand's trigger
    Charge(f32),
    /// Swing the sword with the given tip speed (m/s)
    Swing(f32),
    Release,
    Status,
}

pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    script
        .split([';', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| parse_command(line).with_context(|| format!("Bad script command '{}'", line)))
        .collect()
}

fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or_else(|| anyhow!("empty command"))?;
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("start", []) => Command::Start,
        ("detail", [group]) => Command::Detail(group.parse()?),
        ("wide", [group]) => Command::Wide(group.parse()?),
        ("free", [group]) => Command::FreeRoam(group.parse()?),
        ("return", []) => Command::ReturnToMain,
        ("tick", [seconds]) => Command::Tick(seconds.parse()?),
        ("look", [pitch, seconds]) => Command::Look {
            pitch: pitch.parse()?,
            seconds: seconds.parse()?,
        },
        ("move", [x, y, seconds]) => Command::Move {
            x: x.parse()?,
            y: y.parse()?,
            seconds: seconds.parse()?,
        },
        ("up", [seconds]) => Command::Vertical {
            up: true,
            seconds: seconds.parse()?,
        },
        ("down", [seconds]) => Command::Vertical {
            up: false,
            seconds: seconds.parse()?,
        },
        ("turn", []) => Command::SnapTurn,
        ("grab", [hand]) => Command::Grab(parse_hand(hand)?),
        ("charge", [seconds]) => Command::Charge(seconds.parse()?),
        ("swing", [speed]) => Command::Swing(speed.parse()?),
        ("release", []) => Command::Release,
        ("status", []) => Command::Status,
        (name, args) => bail!("unknown command '{}' with {} argument(s)", name, args.len()),
    };
    Ok(command)
}

fn parse_hand(word: &str) -> Result<Handedness> {
    match word.to_lowercase().as_str() {
        "left" | "l" => Ok(Handedness::Left),
        "right" | "r" => Ok(Handedness::Right),
        other => bail!("expected left or right, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let commands = parse_script("detail 0; look 80 1.0\n# comment\nfree 1;; status").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Detail(0),
                Command::Look {
                    pitch: 80.0,
                    seconds: 1.0
                },
                Command::FreeRoam(1),
                Command::Status,
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_script("detail").is_err());
        assert!(parse_script("fly 3").is_err());
        assert!(parse_script("grab middle").is_err());
        assert!(parse_script("tick soon").is_err());
    }

    #[test]
    fn test_parse_hand() {
        assert_eq!(parse_script("grab R").unwrap(), vec![Command::Grab(Handedness::Right)]);
    }
}
