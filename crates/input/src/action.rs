use glyphworld_common::{EntityId, Position};
use glyphworld_kernel::EntityKind;
use std::str::FromStr;

/// One external input event, routed to the processing phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Move the view entity by a delta.
    Move { dx: i32, dy: i32 },
    /// Move the view entity to an absolute position.
    Goto { x: i32, y: i32 },
    /// Spawn a new entity at the given position.
    Spawn { kind: EntityKind, position: Position },
    /// Remove an entity.
    Despawn(EntityId),
    /// Let the tick pass with no world change.
    Wait,
    /// Stop the loop after the current iteration.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{command}: expected {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
    #[error("{0:?} is not a spawnable kind (generic, grass, drifter)")]
    UnknownKind(String),
    #[error("drifter lifetime must be at least 1 tick")]
    ZeroLifetime,
}

fn ints<const N: usize>(
    args: &[&str],
    command: &'static str,
    expected: &'static str,
) -> Result<[i32; N], ParseError> {
    let bad = || ParseError::Arguments { command, expected };
    if args.len() != N {
        return Err(bad());
    }
    let mut out = [0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().map_err(|_| bad())?;
    }
    Ok(out)
}

impl FromStr for InputEvent {
    type Err = ParseError;

    /// Parse one line of the textual command grammar.
    ///
    /// `w/a/s/d` step the view up/left/down/right (y grows upward), `goto X Y`
    /// jumps to a cell. An empty line is `Wait`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(Self::Wait);
        };
        let event = match (command.to_ascii_lowercase().as_str(), args) {
            ("w", []) => Self::Move { dx: 0, dy: 1 },
            ("a", []) => Self::Move { dx: -1, dy: 0 },
            ("s", []) => Self::Move { dx: 0, dy: -1 },
            ("d", []) => Self::Move { dx: 1, dy: 0 },
            ("wait", []) => Self::Wait,
            ("q" | "quit", []) => Self::Quit,
            ("move", args) => {
                let [dx, dy] = ints::<2>(args, "move", "DX DY")?;
                Self::Move { dx, dy }
            }
            ("goto", args) => {
                let [x, y] = ints::<2>(args, "goto", "X Y")?;
                Self::Goto { x, y }
            }
            ("despawn", [id]) => {
                let id = id.parse().map_err(|_| ParseError::Arguments {
                    command: "despawn",
                    expected: "ID",
                })?;
                Self::Despawn(EntityId(id))
            }
            ("despawn", _) => {
                return Err(ParseError::Arguments {
                    command: "despawn",
                    expected: "ID",
                });
            }
            ("spawn", [kind, rest @ ..]) => parse_spawn(kind, rest)?,
            ("spawn", []) => {
                return Err(ParseError::Arguments {
                    command: "spawn",
                    expected: "KIND X Y",
                });
            }
            _ => return Err(ParseError::UnknownCommand(line.trim().to_string())),
        };
        Ok(event)
    }
}

fn parse_spawn(kind: &str, args: &[&str]) -> Result<InputEvent, ParseError> {
    let (kind, position) = match kind.to_ascii_lowercase().as_str() {
        "generic" | "grass" => {
            let [x, y] = ints::<2>(args, "spawn", "KIND X Y")?;
            let kind = if kind.eq_ignore_ascii_case("grass") {
                EntityKind::Grass
            } else {
                EntityKind::Generic
            };
            (kind, Position::new(x, y))
        }
        "drifter" => {
            const EXPECTED: &str = "drifter X Y DX DY [LIFETIME]";
            let (coords, lifetime) = match args.len() {
                4 => (args, None),
                5 => {
                    let lifetime = args[4].parse::<u32>().map_err(|_| ParseError::Arguments {
                        command: "spawn",
                        expected: EXPECTED,
                    })?;
                    if lifetime == 0 {
                        return Err(ParseError::ZeroLifetime);
                    }
                    (&args[..4], Some(lifetime))
                }
                _ => {
                    return Err(ParseError::Arguments {
                        command: "spawn",
                        expected: EXPECTED,
                    });
                }
            };
            let [x, y, dx, dy] = ints::<4>(coords, "spawn", EXPECTED)?;
            (EntityKind::Drifter { dx, dy, lifetime }, Position::new(x, y))
        }
        other => return Err(ParseError::UnknownKind(other.to_string())),
    };
    Ok(InputEvent::Spawn { kind, position })
}
