use std::str::FromStr;

/// Zoom and scroll adjustments of the projector view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectorEdit {
    Bigger,
    Smaller,
    Up,
    Down,
    /// Back to 100% zoom and no scroll offset.
    Clean,
}

impl FromStr for ProjectorEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bigger" => Ok(ProjectorEdit::Bigger),
            "smaller" => Ok(ProjectorEdit::Smaller),
            "up" => Ok(ProjectorEdit::Up),
            "down" => Ok(ProjectorEdit::Down),
            "clean" => Ok(ProjectorEdit::Clean),
            other => Err(format!("Unknown projector direction '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownCommand {
    Show,
    Hide,
    /// Restart the countdown from now.
    Reset,
    Start,
    Stop,
}

impl FromStr for CountdownCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show" => Ok(CountdownCommand::Show),
            "hide" => Ok(CountdownCommand::Hide),
            "reset" => Ok(CountdownCommand::Reset),
            "start" => Ok(CountdownCommand::Start),
            "stop" => Ok(CountdownCommand::Stop),
            other => Err(format!("Unknown countdown command '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_commands() {
        assert_eq!("clean".parse::<ProjectorEdit>(), Ok(ProjectorEdit::Clean));
        assert_eq!("down".parse::<ProjectorEdit>(), Ok(ProjectorEdit::Down));
        assert_eq!("reset".parse::<CountdownCommand>(), Ok(CountdownCommand::Reset));
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert!("sideways".parse::<ProjectorEdit>().is_err());
        assert!("Show".parse::<CountdownCommand>().is_err());
    }
}
