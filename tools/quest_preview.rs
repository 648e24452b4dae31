/// Quest Preview — interactive shell for generating and playing quests.
///
/// Usage: quest_preview --categories <path> [--descriptions <path>] [--config <path>] [--seed <n>]
///
/// Commands:
///   new [motivation] [depth]   — generate a quest (random strategy without a motivation)
///   show                       — print the current quest with progress marks
///   xml                        — print the current quest as XML
///   todo                       — show the next doable action and the event completing it
///   auto [n]                   — complete the next n doable actions
///   event <VERB> <v@path; ...> — send a gameplay event
///   seed <n>                   — restart the quest sequence from a seed
///   depth <n>                  — set the default depth
///   help                       — list commands
///   quit                       — exit

use quest_generator::core::dispatch::QuestListener;
use quest_generator::core::export::{to_xml_string, QuestVisitor};
use quest_generator::core::generator::QuestGenerator;
use quest_generator::core::quest::{Action, Quest};
use quest_generator::schema::action_type::ActionType;
use quest_generator::schema::event::GameEvent;
use quest_generator::schema::motivation::Motivation;
use quest_generator::schema::objective::ObjectiveValue;
use std::convert::Infallible;
use std::io::{self, BufRead, Write};

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut categories_path = None;
    let mut descriptions_path = None;
    let mut config_path = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--categories" if i + 1 < args.len() => {
                i += 1;
                categories_path = Some(args[i].clone());
            }
            "--descriptions" if i + 1 < args.len() => {
                i += 1;
                descriptions_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(categories_path) = categories_path else {
        eprintln!("ERROR: --categories is required");
        print_usage();
        std::process::exit(1);
    };

    let mut builder = QuestGenerator::builder().seed(seed).categories(&categories_path);
    if let Some(ref path) = descriptions_path {
        builder = builder.descriptions(path);
    }
    if let Some(ref path) = config_path {
        builder = builder.config(path);
    }
    let mut generator = match builder.build() {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Loaded {} categories, {} strategies",
        generator.categories().len(),
        generator.registry().strategy_count()
    );
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let mut depth = generator.config().default_depth;
    let mut quest: Option<Quest> = None;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("quest> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "new" => {
                let (motivation, quest_depth) = match parse_new_args(&parts[1..], depth) {
                    Ok(parsed) => parsed,
                    Err(arg) => {
                        println!("Unknown motivation: {}", arg);
                        print_motivations();
                        continue;
                    }
                };

                let result = match motivation {
                    Some(m) => generator.create_by_motivation(m, quest_depth),
                    None => generator.create_random_quest(quest_depth),
                };
                match result {
                    Ok(q) => {
                        println!(
                            "\n{} actions, {} levels\n",
                            q.total_actions(),
                            q.height()
                        );
                        print_quest(&q, &generator);
                        quest = Some(q);
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "show" => match quest.as_ref() {
                Some(q) => print_quest(q, &generator),
                None => println!("No quest yet. Use 'new' first."),
            },
            "xml" => match quest.as_ref().map(to_xml_string) {
                Some(Ok(xml)) => println!("{}", xml),
                Some(Err(e)) => println!("ERROR: {}", e),
                None => println!("No quest yet. Use 'new' first."),
            },
            "todo" => match quest.as_ref().and_then(Quest::current_action) {
                Some(action) => {
                    println!("Next: {}", generator.describe(action));
                    println!("  {}", event_command(&GameEvent::for_action(action)));
                }
                None if quest.is_some() => println!("Quest complete."),
                None => println!("No quest yet. Use 'new' first."),
            },
            "auto" => {
                let Some(q) = quest.as_mut() else {
                    println!("No quest yet. Use 'new' first.");
                    continue;
                };
                let steps: usize = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                let mut printer = Progress {
                    generator: &generator,
                };
                for _ in 0..steps {
                    let Some(action) = q.current_action() else {
                        break;
                    };
                    let event = GameEvent::for_action(action);
                    if !q.dispatch_with(&event, &mut printer) {
                        println!("Event did not match: {}", event_command(&event));
                        break;
                    }
                }
                if q.is_done() {
                    println!("Quest complete.");
                }
            }
            "event" => {
                let Some(q) = quest.as_mut() else {
                    println!("No quest yet. Use 'new' first.");
                    continue;
                };
                let rest = line[parts[0].len()..].trim_start();
                let event = match parse_event(rest) {
                    Ok(event) => event,
                    Err(msg) => {
                        println!("{}", msg);
                        println!("Usage: event <VERB> <value@path; value@path; ...>");
                        continue;
                    }
                };
                let mut printer = Progress {
                    generator: &generator,
                };
                if !q.dispatch_with(&event, &mut printer) {
                    println!("Nothing to complete with that event.");
                }
            }
            "seed" => {
                if parts.len() < 2 {
                    println!("Current seed: {}", generator.seed());
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(s) => {
                        generator.reseed(s);
                        println!("Seed set to {}", s);
                    }
                    Err(_) => println!("Invalid seed: {}", parts[1]),
                }
            }
            "depth" => {
                if parts.len() < 2 {
                    println!(
                        "Current depth: {} (max {})",
                        depth,
                        generator.config().max_depth
                    );
                    continue;
                }
                match parts[1].parse::<u32>() {
                    Ok(d) => {
                        depth = generator.config().clamp_depth(d);
                        println!("Depth set to {}", depth);
                    }
                    Err(_) => println!("Invalid depth: {}", parts[1]),
                }
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn print_usage() {
    println!("Quest Preview — interactive shell for generating and playing quests.");
    println!();
    println!("Usage: quest_preview --categories <path> [--descriptions <path>] [--config <path>] [--seed <n>]");
    println!();
    println!("  --categories <path>    Category XML file");
    println!("  --descriptions <path>  Description templates (RON), merged over the built-in set");
    println!("  --config <path>        Generator config (RON)");
    println!("  --seed <n>             Initial RNG seed (default: 42)");
    println!();
    println!("Set RUST_LOG=debug to trace executor calls.");
}

fn print_help() {
    println!("Commands:");
    println!("  new [motivation] [depth]     Generate a quest");
    println!("  show                         Print the quest with progress marks");
    println!("  xml                          Print the quest as XML");
    println!("  todo                         Show the next doable action");
    println!("  auto [n]                     Complete the next n doable actions");
    println!("  event <VERB> <v@path; ...>   Send a gameplay event");
    println!("  seed <n>                     Restart the quest sequence from a seed");
    println!("  depth <n>                    Set the default depth");
    println!("  help                         Show this help");
    println!("  quit                         Exit");
    println!();
    print_motivations();
}

fn print_motivations() {
    let names: Vec<&str> = Motivation::ALL.iter().map(|m| m.name()).collect();
    println!("Motivations: {}", names.join(", ").to_lowercase());
}

/// Prints one line per action: `[x]` done, `[>]` next up, `[ ]` pending.
struct Outline<'a> {
    generator: &'a QuestGenerator,
    next: Option<&'a Action>,
}

impl QuestVisitor for Outline<'_> {
    type Error = Infallible;

    fn enter_action(&mut self, action: &Action) -> Result<(), Infallible> {
        let mark = if action.is_done() {
            "[x]"
        } else if self.next.is_some_and(|next| next.path() == action.path()) {
            "[>]"
        } else {
            "[ ]"
        };
        println!(
            "{}{} {}",
            "  ".repeat(action.path().level()),
            mark,
            self.generator.describe(action)
        );
        Ok(())
    }
}

fn print_quest(quest: &Quest, generator: &QuestGenerator) {
    let mut outline = Outline {
        generator,
        next: quest.current_action(),
    };
    match quest.walk(&mut outline) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    println!();
}

struct Progress<'a> {
    generator: &'a QuestGenerator,
}

impl QuestListener for Progress<'_> {
    fn action_done(&mut self, action: &Action) {
        println!("  done: {}", self.generator.describe(action));
    }

    fn quest_done(&mut self, quest: &Quest) {
        println!("  quest of {} action(s) complete", quest.len());
    }
}

fn parse_new_args<'a>(
    args: &[&'a str],
    default_depth: u32,
) -> Result<(Option<Motivation>, u32), &'a str> {
    let mut motivation = None;
    let mut depth = default_depth;
    for arg in args {
        if let Ok(n) = arg.parse::<u32>() {
            depth = n;
        } else {
            motivation = Some(Motivation::from_name(arg).ok_or(*arg)?);
        }
    }
    Ok((motivation, depth))
}

/// Parse `VERB value@path; value@path` into an event, values in the verb's
/// event slot order.
fn parse_event(input: &str) -> Result<GameEvent, String> {
    let (verb, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    let verb = ActionType::from_name(verb).ok_or_else(|| format!("Unknown verb: {}", verb))?;
    if verb.event_slots().is_empty() {
        return Err(format!("{} carries no event", verb));
    }

    let mut values = Vec::new();
    for item in rest.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (value, path) = item
            .rsplit_once('@')
            .ok_or_else(|| format!("Expected value@path, got '{}'", item))?;
        values.push(ObjectiveValue::new(value.trim(), path.trim()));
    }
    GameEvent::with_values(verb, values).ok_or_else(|| {
        let slots: Vec<&str> = verb.event_slots().iter().map(|s| s.name()).collect();
        format!("{} takes {} value(s): {}", verb, slots.len(), slots.join(", "))
    })
}

fn event_command(event: &GameEvent) -> String {
    let values: Vec<String> = event
        .payload
        .iter()
        .map(|(_, v)| format!("{}@{}", v.value, v.path))
        .collect();
    format!("event {} {}", event.verb, values.join("; "))
}
