use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nestor_core::controller::Button;

/// Headless Nestor runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the iNES ROM file
    #[arg(required = true)]
    pub rom: PathBuf,

    /// Number of frames to emulate
    #[arg(short, long, default_value_t = 60)]
    pub frames: u64,

    /// Start executing at this address instead of the reset vector (hex, e.g. C000)
    #[arg(long, value_parser = parse_hex_u16)]
    pub start_address: Option<u16>,

    /// Write the last frame to this PNG file
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Pace emulation at 60 frames per second
    #[arg(long)]
    pub realtime: bool,

    /// Buttons held on pad 1 for the whole run
    #[arg(long, value_enum, value_delimiter = ',')]
    pub hold: Vec<HeldButton>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeldButton {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl From<HeldButton> for Button {
    fn from(button: HeldButton) -> Self {
        match button {
            HeldButton::A => Button::A,
            HeldButton::B => Button::B,
            HeldButton::Select => Button::Select,
            HeldButton::Start => Button::Start,
            HeldButton::Up => Button::Up,
            HeldButton::Down => Button::Down,
            HeldButton::Left => Button::Left,
            HeldButton::Right => Button::Right,
        }
    }
}

fn parse_hex_u16(value: &str) -> Result<u16, String> {
    let digits = value
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .trim_start_matches('$');
    u16::from_str_radix(digits, 16).map_err(|err| format!("invalid address {value:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_addresses_in_common_notations() {
        assert_eq!(parse_hex_u16("C000"), Ok(0xC000));
        assert_eq!(parse_hex_u16("0x8000"), Ok(0x8000));
        assert_eq!(parse_hex_u16("$FFFC"), Ok(0xFFFC));
        assert!(parse_hex_u16("zz").is_err());
    }

    #[test]
    fn parses_held_buttons() {
        let args = Args::try_parse_from(["nestor", "game.nes", "--hold", "start,right", "-f", "5"])
            .expect("valid arguments");
        assert_eq!(args.hold, [HeldButton::Start, HeldButton::Right]);
        assert_eq!(args.frames, 5);
        assert!(args.png.is_none());
    }
}
