use std::error::Error;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use atty::Stream;
use clap::{Parser, Subcommand};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};
use tokio::runtime::{Builder, Runtime};
use wsd_lesk::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_BASE_URL, ENV_TIMEOUT_SECS};
use wsd_lesk::{
    ClientConfig, Controller, CycleReport, Highlight, HttpBackend, RelationNode, SignatureGroup,
    Strategy, ViewModel, WsdBackend, build_tree,
};

#[derive(Parser, Debug)]
#[command(
    name = "wsd-lesk",
    about = "Disambiguate words in context with a Lesk backend",
    version
)]
pub struct Cli {
    /// Emit JSON instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    /// Base URL of the disambiguation API.
    #[arg(long, global = true, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    api_base: String,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how a sentence is split into selectable tokens.
    Tokens {
        /// Sentence to tokenize.
        sentence: String,
    },
    /// Find the sense of one word in a sentence.
    Find {
        /// Sentence that provides the context.
        sentence: String,
        /// Ambiguous word; must be one of the sentence's tokens.
        #[arg(short, long)]
        word: String,
        /// `basic` or `extended`.
        #[arg(short, long, default_value_t = Strategy::default())]
        strategy: Strategy,
        /// Also dump the raw word-info payload.
        #[arg(long)]
        raw: bool,
    },
    /// Show hypernyms and hyponyms for every sense of a word.
    WordInfo {
        /// Word to look up.
        word: String,
    },
    /// Interactive session.
    Repl,
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = ClientConfig::new(&cli.api_base, Duration::from_secs(cli.timeout_secs))?;
    match cli.command {
        Command::Tokens { sentence } => handle_tokens(&sentence, cli.json),
        Command::Find {
            sentence,
            word,
            strategy,
            raw,
        } => handle_find(&config, &sentence, &word, strategy, raw, cli.json),
        Command::WordInfo { word } => handle_word_info(&config, &word, cli.json),
        Command::Repl => handle_repl(&config),
    }
}

fn runtime() -> io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

fn handle_tokens(sentence: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let tokens = wsd_lesk::tokenize(sentence);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }
    let width = tokens.len().to_string().len().max("#".len());
    println!("{:>width$}  {}", "#", "TOKEN", width = width);
    for (index, token) in tokens.into_iter().enumerate() {
        let shown = if token.is_empty() { "<empty>" } else { token };
        println!("{:>width$}  {}", index, shown, width = width);
    }
    Ok(())
}

fn handle_find(
    config: &ClientConfig,
    sentence: &str,
    word: &str,
    strategy: Strategy,
    raw: bool,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let controller = Controller::new(HttpBackend::new(config)?);
    controller.set_sentence(sentence);
    controller.select(word)?;
    controller.set_strategy(strategy);

    let report = runtime()?
        .block_on(controller.find_sense())
        .ok_or("no word selected")?;
    let view = ViewModel::from_state(&controller.snapshot());

    if as_json {
        let payload = json!({
            "view": view,
            "sense_error": report.sense_error.as_ref().map(ToString::to_string),
            "word_info_error": report.word_info_error.as_ref().map(ToString::to_string),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_report(&report);
        print_view(&view, raw)?;
    }
    Ok(())
}

fn handle_word_info(config: &ClientConfig, word: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let backend = HttpBackend::new(config)?;
    let info = runtime()?.block_on(backend.word_info(word))?;
    let tree = build_tree(&info.senses);
    if as_json {
        let payload = json!({ "word": word, "tree": tree, "raw": info.raw });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_tree(&tree);
    }
    Ok(())
}

const REPL_HELP: &str = "\
commands:
  sentence <text>       replace the sentence (clears selection and results)
  select <word|#index>  choose the ambiguous word
  strategy <name>       basic or extended
  find                  look up the sense of the selected word
  show                  print the current state
  raw                   print the raw word-info payload
  reset                 clear selection and results
  help                  this text
  quit                  leave";

fn handle_repl(config: &ClientConfig) -> Result<(), Box<dyn Error>> {
    let controller = Controller::new(HttpBackend::new(config)?);
    let runtime = runtime()?;
    println!("wsd-lesk REPL against {}\ntype `help` for commands", config.base_url);

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim_end_matches(['\r', '\n']);
        let (command, rest) = line
            .trim_start()
            .split_once(' ')
            .unwrap_or((line.trim(), ""));
        match command {
            "" => continue,
            "quit" | "exit" | ":q" => break,
            "help" => println!("{REPL_HELP}"),
            "sentence" => {
                controller.set_sentence(rest);
                print_view(&ViewModel::from_state(&controller.snapshot()), false)?;
            }
            "select" => {
                let rest = rest.trim();
                let result = match rest.strip_prefix('#') {
                    Some(index) => match index.parse::<usize>() {
                        Ok(index) => controller.select_at(index),
                        Err(_) => {
                            println!("not a token index: {index:?}");
                            continue;
                        }
                    },
                    None => controller.select(rest),
                };
                match result {
                    Ok(()) => print_tokens(&ViewModel::from_state(&controller.snapshot())),
                    Err(err) => println!("{err}"),
                }
            }
            "strategy" => match rest.parse::<Strategy>() {
                Ok(strategy) => {
                    controller.set_strategy(strategy);
                    println!("strategy: {}", strategy.label());
                }
                Err(err) => println!("{err}"),
            },
            "find" => match runtime.block_on(controller.find_sense()) {
                Some(report) => {
                    print_report(&report);
                    print_view(&ViewModel::from_state(&controller.snapshot()), false)?;
                }
                None => println!("select a word first"),
            },
            "show" => print_view(&ViewModel::from_state(&controller.snapshot()), false)?,
            "raw" => match controller.snapshot().word_info() {
                Some(group) => println!("{}", serde_json::to_string_pretty(&group.info.raw)?),
                None => println!("no word info"),
            },
            "reset" => {
                controller.restart_search();
                print_tokens(&ViewModel::from_state(&controller.snapshot()));
            }
            other => println!("unknown command {other:?}; type `help`"),
        }
    }
    Ok(())
}

fn print_report(report: &CycleReport) {
    if let Some(err) = &report.sense_error {
        eprintln!("no sense for {:?}: {err}", report.ticket.request.word());
    }
    if let Some(err) = &report.word_info_error {
        eprintln!("no word info for {:?}: {err}", report.ticket.request.word());
    }
}

fn print_tokens(view: &ViewModel) {
    let rendered: Vec<String> = view
        .tokens
        .iter()
        .map(|token| {
            if token.selected {
                format!("[{}]", token.text)
            } else {
                token.text.clone()
            }
        })
        .collect();
    println!("{}", rendered.join(" "));
}

fn print_view(view: &ViewModel, raw: bool) -> Result<(), Box<dyn Error>> {
    print_tokens(view);
    println!("Strategy: {}", view.strategy.label());

    if let Some(panel) = &view.sense {
        println!("\nSense: {}", panel.sense);
        println!("{}", panel.definition);
        for group in &panel.signatures {
            render_markdown_block(group.label, &signature_markdown(group));
        }
    }

    if let Some(tree) = &view.relation_tree {
        println!();
        print_tree(tree);
    }

    if raw {
        if let Some(info) = &view.word_info {
            println!("\nWord Info:");
            println!("{}", serde_json::to_string_pretty(info)?);
        }
    }
    Ok(())
}

fn signature_markdown(group: &SignatureGroup) -> String {
    group
        .words
        .iter()
        .map(|word| match word.highlight {
            Highlight::Selected => format!("**{}**", word.word),
            Highlight::Contextual => format!("*{}*", word.word),
            Highlight::Neutral => word.word.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_tree(root: &RelationNode) {
    println!("{}", root.name);
    if root.children.is_empty() {
        println!("  (no senses)");
    }
    for sense in &root.children {
        println!("- {}", describe(sense));
        for related in &sense.children {
            println!("    - {}", describe(related));
        }
    }
}

fn describe(node: &RelationNode) -> String {
    match &node.definition {
        Some(definition) => format!("{}: {}", node.name, definition),
        None => node.name.clone(),
    }
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(title: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    println!("\n{title}:");
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{trimmed}");
    }
}
