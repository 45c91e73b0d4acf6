/// Countdown rendering rules shared by every presentation shell

pub const TITLE: &str = "SPIKE PLANTED";
pub const SUBTITLE: &str = "seconds remaining";

const WARNING_AT_SECS: u32 = 10;
const CRITICAL_AT_SECS: u32 = 5;

/// How alarming the countdown should look
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

impl Urgency {
    pub fn for_remaining(remaining_secs: u32) -> Self {
        if remaining_secs <= CRITICAL_AT_SECS {
            Urgency::Critical
        } else if remaining_secs <= WARNING_AT_SECS {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

/// Two-digit remaining time, e.g. `07`
pub fn format_seconds(remaining_secs: u32) -> String {
    format!("{:02}", remaining_secs)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerDisplay {
    pub digits: String,
    pub urgency: Urgency,
}

impl TimerDisplay {
    pub fn new(remaining_secs: u32) -> Self {
        Self {
            digits: format_seconds(remaining_secs),
            urgency: Urgency::for_remaining(remaining_secs),
        }
    }

    /// Single-line rendering for text shells
    pub fn render_line(&self) -> String {
        let marker = match self.urgency {
            Urgency::Normal => "  ",
            Urgency::Warning => "! ",
            Urgency::Critical => "!!",
        };
        format!("{} {} {} {}", marker, TITLE, self.digits, SUBTITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds_pads() {
        assert_eq!(format_seconds(0), "00");
        assert_eq!(format_seconds(7), "07");
        assert_eq!(format_seconds(45), "45");
        assert_eq!(format_seconds(120), "120");
    }

    #[test]
    fn test_urgency_boundaries() {
        assert_eq!(Urgency::for_remaining(45), Urgency::Normal);
        assert_eq!(Urgency::for_remaining(11), Urgency::Normal);
        assert_eq!(Urgency::for_remaining(10), Urgency::Warning);
        assert_eq!(Urgency::for_remaining(6), Urgency::Warning);
        assert_eq!(Urgency::for_remaining(5), Urgency::Critical);
        assert_eq!(Urgency::for_remaining(0), Urgency::Critical);
    }

    #[test]
    fn test_render_line() {
        assert_eq!(
            TimerDisplay::new(4).render_line(),
            "!! SPIKE PLANTED 04 seconds remaining"
        );
    }
}
