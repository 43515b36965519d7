//! Topic help with setup guidance, file format notes and usage examples

use crate::config::env::EnvManager;
use colored::*;

/// Help system for the CLI application
pub struct HelpSystem {
    platform: String,
}

impl HelpSystem {
    /// Topics accepted by `--help-topic`
    pub const TOPICS: [&'static str; 4] = ["setup", "format", "config", "examples"];

    /// Create a new help system
    pub fn new() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
        }
    }

    /// Display the main help message
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));
        help.push('\n');
        help.push_str(&format!(
            "More help: --help for all options, --help-topic <{}>\n",
            Self::TOPICS.join("|")
        ));

        help
    }

    /// Display quick help for specific topics
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "setup" | "wiring" | "troubleshooting" => Some(self.format_setup_help(use_colors)),
            "format" | "csv" => Some(self.format_file_format_help(use_colors)),
            "config" | "configuration" | "env" => Some(self.format_configuration_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    /// Format the main header
    fn format_header(&self, use_colors: bool) -> String {
        let title = "G2G Delay Recorder";
        let subtitle = "Glass-to-glass latency measurements from a phototransistor device";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title.bright_cyan().bold(),
                subtitle.bright_blue(),
                version.green(),
                self.platform.yellow()
            )
        } else {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title, subtitle, version, self.platform
            )
        }
    }

    fn section_header(title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format the usage section
    fn format_usage_section(&self, use_colors: bool) -> String {
        let usage_patterns = [
            "g2g [FILENAME.csv] [NUM_MEASUREMENTS] [OPTIONS]",
            "g2g FILENAME.csv --readcsv [OPTIONS]",
            "g2g --help-topic <TOPIC>",
        ];

        let mut usage = format!("{}\n", Self::section_header("USAGE:", use_colors));
        for pattern in usage_patterns {
            if use_colors {
                usage.push_str(&format!("  {}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("  {}\n", pattern));
            }
        }

        usage
    }

    /// Format the examples section
    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Default run",
                command: "g2g",
                description: "Collect 100 measurements into results.csv and plot results.svg",
            },
            ExampleHelp {
                title: "Named run, quiet",
                command: "g2g living-room-tv.csv 300 --quiet",
                description: "Collect 300 measurements showing a single progress line",
            },
            ExampleHelp {
                title: "Replay",
                command: "g2g living-room-tv.csv --readcsv",
                description: "Re-plot a saved run without touching the device",
            },
            ExampleHelp {
                title: "Explicit port",
                command: "g2g monitor.csv 50 --port /dev/ttyACM0 --max-attempts 6",
                description: "Skip discovery and give up after 6 silent reads in a row",
            },
        ];

        let mut section = format!("{}\n", Self::section_header("EXAMPLES:", use_colors));
        for example in &examples {
            section.push_str(&example.format(use_colors));
        }
        section
    }

    /// Setup and troubleshooting guidance for the sensor
    fn format_setup_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", Self::section_header("DEVICE SETUP:", use_colors));
        help.push_str("  1. Connect the measurement board over USB; it is found by its vendor string\n");
        help.push_str("     (default \"Arduino\", see --vendor) unless --port is given.\n");
        help.push_str("  2. Place the phototransistor against the screen with the flat side (the one\n");
        help.push_str("     with the knob) facing the LED area.\n");
        help.push_str("  3. Set the screen brightness high; maximum is recommended.\n\n");

        help.push_str(&format!("{}\n", Self::section_header("WHEN NO DATA ARRIVES:", use_colors)));
        help.push_str("  - A stall notice appears after every read timeout (default 5s).\n");
        help.push_str("  - Lines without a decimal point are treated as device chatter and skipped.\n");
        help.push_str("  - A line with a decimal point that is not a number stops the run.\n");
        help.push_str("  - Press Ctrl+C to stop; nothing is saved for an interrupted run.\n");
        if self.platform == "linux" {
            help.push_str("  - On Linux your user may need to be in the 'dialout' group.\n");
        }

        help
    }

    /// Results file layout
    fn format_file_format_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", Self::section_header("RESULTS FILE (.csv):", use_colors));
        help.push_str("  Row 1: Samples,Min,Max,Mean,Median,stdDev\n");
        help.push_str("  Row 2: the six statistics, in the order of row 1\n");
        help.push_str("  Row 3: every measurement in milliseconds, in acquisition order\n\n");
        help.push_str("  The standard deviation is the population one (divisor N).\n");
        help.push_str("  Replay reads rows by position; header text is not checked and\n");
        help.push_str("  rows after the third are ignored.\n");
        help.push_str("  The histogram is written next to the file with a .svg extension.\n");
        help
    }

    /// Configuration sources
    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", Self::section_header("CONFIGURATION:", use_colors));
        help.push_str(&EnvManager::display_env_help());
        help.push_str("\nUse --print-env-example to print a commented .env template.\n");
        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n",
                self.title, self.command, self.description
            )
        }
    }
}
