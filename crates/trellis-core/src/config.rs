use std::time::Duration;

/// Tunables shared by every widget created from one UI context.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Space kept between a clipped element and the far edge of its scroll container.
    pub clip_margin: f32,
    /// Horizontal padding kept between a popup and its bounding container.
    pub popup_padding: f32,
    /// Default width of popups owned by popup buttons and popup tools.
    pub popup_width: f32,
    /// How long a popup keeps its `transitioning` class after a display change.
    pub popup_transition: Duration,
    /// Delay between a dialog starting to close and the window actually closing.
    pub dialog_close_delay: Duration,
    /// Length of each step of the highlight flash played when a menu item is chosen.
    pub flash_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clip_margin: 10.0,
            popup_padding: 10.0,
            popup_width: 320.0,
            popup_transition: Duration::from_millis(200),
            dialog_close_delay: Duration::from_millis(250),
            flash_interval: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = Config::default();
        assert_eq!(config.popup_transition, Duration::from_millis(200));
        assert_eq!(config.dialog_close_delay, Duration::from_millis(250));
        assert_eq!(config.flash_interval, Duration::from_millis(100));
        assert_eq!(config.clip_margin, 10.0);
    }
}
