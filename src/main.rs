use clap::{Arg, ArgAction, Command};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use graph_sketch::editor::session::EditorSession;
use graph_sketch::jobs::JobBus;
use graph_sketch::persistence::persist;
use graph_sketch::persistence::settings::AppSettings;
use graph_sketch::render::HeadlessRenderer;
use graph_sketch::shell::commands;

fn main() {
    env_logger::init();

    let matches = Command::new("gsketch")
        .about("Graph-Sketch Shell — drive the interactive graph editor from the terminal")
        .arg(
            Arg::new("eval")
                .short('e')
                .long("eval")
                .value_name("COMMAND")
                .help("Run a single command and exit"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress banner text"),
        )
        .get_matches();

    let settings = AppSettings::load().unwrap_or_default();
    persist::set_settings_override(settings.clone());

    let mut session = EditorSession::new();
    session.set_max_nodes(settings.generate_max_nodes);
    session.node_form.color = settings.default_node_color.clone();
    session.edge_form.color = settings.default_edge_color.clone();
    let mut jobs = JobBus::default();
    let mut renderer = HeadlessRenderer::default();

    // One-off eval mode
    if let Some(command) = matches.get_one::<String>("eval") {
        match commands::execute_and_log(&mut session, &mut jobs, &mut renderer, command) {
            Ok(outcome) => {
                for row in &outcome.rows {
                    print_response(row);
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    // Interactive mode with history
    let mut rl: Editor<(), DefaultHistory> = match Editor::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("failed to initialize editor: {e}");
            std::process::exit(1);
        }
    };
    let mut hist_path = AppSettings::settings_dir();
    hist_path.push("gsketch_history.txt");
    let _ = std::fs::create_dir_all(
        hist_path
            .parent()
            .unwrap_or_else(|| std::path::Path::new(".")),
    );
    let _ = rl.load_history(&hist_path);

    if !matches.get_flag("quiet") {
        eprintln!(
            "Graph-Sketch Shell.\nType commands and press Enter. Commands: :help, quit / exit. History saved at {}.\n",
            hist_path.display()
        );
    }

    loop {
        match rl.readline("gsketch> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if input == ":quit"
                    || input.eq_ignore_ascii_case("quit")
                    || input.eq_ignore_ascii_case("exit")
                {
                    break;
                }
                if input == ":help" || input == "?" {
                    println!("{}", commands::HELP);
                    continue;
                }
                rl.add_history_entry(input).ok();

                match commands::execute_and_log(&mut session, &mut jobs, &mut renderer, input) {
                    Ok(outcome) => {
                        for row in &outcome.rows {
                            print_response(row);
                        }
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                break;
            }
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);
}

fn print_response(s: &str) {
    // Try to pretty-print JSON; otherwise print raw
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(s) {
        match serde_json::to_string_pretty(&v) {
            Ok(p) => println!("{}", p),
            Err(_) => println!("{}", s),
        }
    } else {
        println!("{}", s);
    }
}
