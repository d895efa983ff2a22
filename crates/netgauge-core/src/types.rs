use std::fmt;

/// Display channel number (the pin addressed in the command path).
pub type Channel = u8;

/// Digital output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    /// `High` when `on` is true.
    pub fn from_bool(on: bool) -> Self {
        if on { Level::High } else { Level::Low }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "HIGH",
            Level::Low => "LOW",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single command for the display.
///
/// Rendered as a path of the shape `/<channel>/<value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Set an analog (PWM) channel to 0–255.
    Analog { channel: Channel, value: u8 },
    /// Drive a digital channel high or low.
    Digital { channel: Channel, level: Level },
}

impl Command {
    pub fn channel(&self) -> Channel {
        match self {
            Command::Analog { channel, .. } | Command::Digital { channel, .. } => *channel,
        }
    }

    /// Request path for this command.
    pub fn path(&self) -> String {
        match self {
            Command::Analog { channel, value } => format!("/{channel}/{value}"),
            Command::Digital { channel, level } => format!("/{channel}/{level}"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analog_path() {
        let cmd = Command::Analog {
            channel: 5,
            value: 150,
        };
        assert_eq!(cmd.path(), "/5/150");
        assert_eq!(cmd.channel(), 5);
    }

    #[test]
    fn digital_path() {
        let high = Command::Digital {
            channel: 15,
            level: Level::High,
        };
        let low = Command::Digital {
            channel: 16,
            level: Level::Low,
        };
        assert_eq!(high.to_string(), "/15/HIGH");
        assert_eq!(low.to_string(), "/16/LOW");
    }

    #[test]
    fn level_from_bool() {
        assert_eq!(Level::from_bool(true), Level::High);
        assert_eq!(Level::from_bool(false), Level::Low);
    }
}
