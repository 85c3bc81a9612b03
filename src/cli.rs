use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "thinkstream")]
#[command(about = "Turn an agent's streamed output into a typed conversation log", long_about = None)]
pub struct Args {
    #[arg(short = 'q', long = "query", help = "User query that started this turn")]
    pub query: Option<String>,

    #[arg(long = "events", help = "Print render events as JSON Lines instead of drawing them")]
    pub events: bool,

    #[arg(long = "hide-reasoning", help = "Do not draw reasoning blocks (they are still logged)")]
    pub hide_reasoning: bool,

    #[arg(short = 'o', long = "output", help = "Write the conversation log as JSON to this file")]
    pub output: Option<PathBuf>,

    #[arg(long = "save", help = "Store the conversation in the transcript history")]
    pub save: bool,

    #[arg(long = "clear", help = "Clear all stored transcripts")]
    pub clear_history: bool,

    #[arg(long = "last", help = "Print the most recently stored transcript and exit")]
    pub last: bool,

    #[arg(long = "open-marker", help = "Opening reasoning marker (default <think>)")]
    pub open_marker: Option<String>,

    #[arg(long = "close-marker", help = "Closing reasoning marker (default </think>)")]
    pub close_marker: Option<String>,

    #[arg(long = "item-timeout", help = "Seconds to wait for the next stream item")]
    pub item_timeout: Option<u64>,

    #[arg(long = "max-turn-secs", help = "Maximum duration of the whole turn in seconds")]
    pub max_turn_secs: Option<u64>,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostics to stderr")]
    pub verbose: bool,

    #[arg(help = "JSON Lines file of stream items (stdin when omitted or '-')")]
    pub input: Option<PathBuf>,
}
