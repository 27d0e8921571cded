/// Preview — terminal walkthrough shell for testing stories without a
/// graphical host.
///
/// Usage: preview [--width <cols>] [--start <scene-id>]
///
/// Commands:
///   <enter> / n     — advance the story
///   b               — step back one scene
///   1..9            — pick a choice by number
///   jump <id>       — jump straight to a scene
///   vars            — dump the variable store
///   help            — list commands
///   quit            — exit

use fable_engine::core::graph::{Advance, SceneGraph, StoryError};
use fable_engine::core::layout::{wrap, MonospaceMeasure};
use fable_engine::core::variables::VariableStore;
use fable_engine::schema::condition::Condition;
use fable_engine::schema::scene::{Action, Scene};
use std::io::{self, BufRead, Write};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut width: usize = 60;
    let mut start: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--width" if i + 1 < args.len() => {
                i += 1;
                width = args[i].parse().unwrap_or(60);
            }
            "--start" if i + 1 < args.len() => {
                i += 1;
                start = Some(args[i].clone());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut graph = demo_story();
    let mut vars = VariableStore::new();
    if let Err(err) = graph.validate() {
        eprintln!("Story validation failed: {err}");
        std::process::exit(1);
    }
    if let Some(id) = start {
        if let Err(err) = graph.jump(&id, &mut vars) {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }

    println!("Story preview. Type 'help' for commands.\n");
    print_scene(&graph, &vars, width);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();

        let result = match line {
            "quit" | "q" => break,
            "help" => {
                print_usage();
                Ok(false)
            }
            "" | "n" => step_forward(&mut graph, &mut vars),
            "b" => {
                if !graph.retreat() {
                    println!("Already at the beginning.");
                }
                Ok(true)
            }
            "vars" => {
                dump_vars(&vars);
                Ok(false)
            }
            _ => {
                if let Some(id) = line.strip_prefix("jump ") {
                    graph.jump(id.trim(), &mut vars).map(|_| true)
                } else if let Ok(n) = line.parse::<usize>() {
                    pick_choice(&mut graph, &mut vars, n)
                } else {
                    println!("Unknown command: {line}");
                    Ok(false)
                }
            }
        };

        match result {
            Ok(true) => print_scene(&graph, &vars, width),
            Ok(false) => {}
            Err(err) => println!("{err}"),
        }
    }
}

/// Advance one beat; reports whether the scene changed.
fn step_forward(graph: &mut SceneGraph, vars: &mut VariableStore) -> Result<bool, StoryError> {
    match graph.advance(vars)? {
        Advance::Moved => Ok(true),
        Advance::ChoicesOpen => {
            println!("Pick a choice by number.");
            Ok(false)
        }
        Advance::End => {
            println!("The story has ended.");
            Ok(false)
        }
    }
}

fn pick_choice(
    graph: &mut SceneGraph,
    vars: &mut VariableStore,
    n: usize,
) -> Result<bool, StoryError> {
    let target = graph
        .visible_choices(vars)
        .get(n.wrapping_sub(1))
        .map(|c| c.target.clone());
    match target {
        Some(target) => graph.jump(&target, vars).map(|_| true),
        None => {
            println!("No such choice: {n}");
            Ok(false)
        }
    }
}

fn print_scene(graph: &SceneGraph, vars: &VariableStore, width: usize) {
    let scene = match graph.current() {
        Ok(scene) => scene,
        Err(_) => {
            println!("(empty story)");
            return;
        }
    };

    println!("{}", "-".repeat(width));
    if let Some(name) = scene.display_name() {
        println!("[{name}]");
    }
    let measure = MonospaceMeasure { advance: 1.0 };
    for line in wrap(&scene.text, width as f32, usize::MAX, &measure) {
        println!("{line}");
    }
    let choices = graph.visible_choices(vars);
    if !choices.is_empty() {
        println!();
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}. {}", i + 1, choice.text);
        }
    }
    println!("{}", "-".repeat(width));
}

fn dump_vars(vars: &VariableStore) {
    if vars.is_empty() {
        println!("(no variables set)");
        return;
    }
    let mut entries: Vec<_> = vars.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in entries {
        println!("  {name} = {value:?}");
    }
}

/// Small built-in story exercising choices, gates, and entry actions.
fn demo_story() -> SceneGraph {
    let gate = Condition::var_equals("found_key", true);
    let mut graph = SceneGraph::new();
    graph.add(
        Scene::new("You wake in a dim study. A locked door, a cluttered desk.")
            .with_id("study"),
    );
    graph.add(
        Scene::new("What do you do?")
            .with_id("hub")
            .with_choice("Search the desk", "desk", None)
            .with_choice("Try the door", "door_locked", None)
            .with_choice("Unlock the door", "outside", Some(gate)),
    );
    graph.add(
        Scene::new("Under a stack of letters you find a small brass key.")
            .with_id("desk")
            .with_on_enter(Action::set_variable("found_key", true))
            .with_next("hub"),
    );
    graph.add(
        Scene::new("The handle does not budge.")
            .with_id("door_locked")
            .with_next("hub"),
    );
    graph.add(Scene::new("The key turns. Morning light floods in.").with_id("outside"));
    graph
}

fn print_usage() {
    println!("Usage: preview [--width <cols>] [--start <scene-id>]");
    println!();
    println!("Commands:");
    println!("  <enter> / n     advance the story");
    println!("  b               step back one scene");
    println!("  1..9            pick a choice by number");
    println!("  jump <id>       jump straight to a scene");
    println!("  vars            dump the variable store");
    println!("  help            this message");
    println!("  quit            exit");
}
