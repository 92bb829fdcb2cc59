pub mod cli_consts {
    //! Client Configuration Constants
    //!
    //! Configuration constants for the portfolio client, grouped by area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Buffer size of the event channel shared by the controllers.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Buffer size of the channel carrying panel updates to the UI loop.
    pub const UPDATE_QUEUE_SIZE: usize = 16;

    // =============================================================================
    // COMMENTS PANEL
    // =============================================================================

    /// Choices offered by the comment count selector.
    pub const COMMENT_COUNT_OPTIONS: [u32; 4] = [5, 10, 20, 50];

    /// Selector value used when nothing else is configured.
    pub const DEFAULT_MAX_COMMENTS: u32 = 5;

    /// Notice appended to the panel when nobody is logged in.
    pub const LOGIN_PROMPT: &str = "Please log in to view and post comments.";

    pub const LOGIN_PATH: &str = "/login";
    pub const LOGOUT_PATH: &str = "/logout";

    // =============================================================================
    // CHARTS
    // =============================================================================

    /// Fixed display options for the two transient response charts.
    pub mod chart {
        pub const RESPONSE_TITLE: &str = "RLC Circuit Transient Response";
        pub const RESIDUAL_TITLE: &str = "Residuals";
        pub const TIME_AXIS_TITLE: &str = "Time (s)";
        pub const AMPLITUDE_AXIS_TITLE: &str = "Amplitude (V)";
        pub const RESIDUAL_AXIS_TITLE: &str = "Residual (V)";
        pub const EXPERIMENTAL_LABEL: &str = "Experimental";
        pub const THEORETICAL_LABEL: &str = "Theoretical";
        pub const RESIDUAL_LABEL: &str = "Residual";
        /// Chart width in terminal columns.
        pub const WIDTH: u16 = 100;
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    pub mod http {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 10;
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        /// Where `POST /data` sends the browser once the comment is stored.
        pub const POST_REDIRECT_PATH: &str = "/index.html";

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }
}
