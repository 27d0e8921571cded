/// Lab Tour example — a complete branching story driven from the terminal.
///
/// A campus visit: meet Dr. Carter, tour three wings in any order, and
/// head home once all three have been seen.
///
/// Run with: cargo run --example lab_tour

use fable_engine::core::engine::Engine;
use fable_engine::core::graph::Advance;
use fable_engine::schema::condition::Condition;
use fable_engine::schema::scene::{Action, CharacterPosition, Scene};
use std::io::{self, BufRead};

fn main() {
    let mut engine = Engine::builder().build();
    build_story(&mut engine);
    engine.validate().expect("story references a missing scene");

    println!("Lab Tour — press enter to advance, type a number to choose.\n");

    let stdin = io::stdin();
    loop {
        let scene = match engine.current_scene() {
            Ok(scene) => scene,
            Err(_) => break,
        };
        if let Some(name) = scene.display_name() {
            println!("[{name}] {}", scene.text);
        } else {
            println!("{}", scene.text);
        }

        let choices: Vec<(String, String)> = engine
            .visible_choices()
            .iter()
            .map(|c| (c.text.clone(), c.target.clone()))
            .collect();
        if !choices.is_empty() {
            for (i, (text, _)) in choices.iter().enumerate() {
                println!("  {}. {text}", i + 1);
            }
            let picked = loop {
                let mut line = String::new();
                if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
                    return;
                }
                match line.trim().parse::<usize>() {
                    Ok(n) if n >= 1 && n <= choices.len() => break n - 1,
                    _ => println!("Pick 1..{}", choices.len()),
                }
            };
            engine
                .jump(&choices[picked].1)
                .expect("choice target vanished");
            continue;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        match engine.advance() {
            Ok(Advance::End) => {
                println!("\n-- the end --");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }
}

fn build_story(engine: &mut Engine) {
    engine.add_scene(
        Scene::new("A bright morning. The research campus gates slide open.")
            .with_id("start")
            .with_background("courtyard"),
    );
    engine.add_scene(
        Scene::new("Welcome! I'm Dr. Carter. Let me show you around.")
            .with_id("meet_carter")
            .with_character("carter")
            .with_speaker_name("Dr. Carter")
            .with_background("courtyard")
            .at(CharacterPosition::Left),
    );

    let seen_everything = Condition::parse_ron(
        r#"(
            variable: "visited_music",
            equals: true,
            and: [
                (variable: "visited_manufacturing", equals: true),
                (variable: "visited_residential", equals: true),
            ],
        )"#,
    )
    .expect("condition data");

    engine.add_scene(
        Scene::new("Where shall we start?")
            .with_id("first_choice")
            .with_character("carter")
            .with_speaker_name("Dr. Carter")
            .with_background("courtyard")
            .with_choice("The music wing", "music_class", None)
            .with_choice("The manufacturing floor", "manufacturing", None)
            .with_choice("The residential block", "residential", None)
            .with_choice("Head home", "rest", Some(seen_everything)),
    );

    // --- music wing ---
    engine.add_scene(
        Scene::new("Strings and synthesizers line the walls of the music wing.")
            .with_id("music_class")
            .with_background("music_room")
            .with_on_enter(Action::set_variable("visited_music", true)),
    );
    engine.add_scene(
        Scene::new("Hi! I'm Lily. I'm scoring a game about tide pools.")
            .with_id("lily_intro")
            .with_character("lily")
            .with_speaker_name("Lily")
            .with_background("music_room")
            .at(CharacterPosition::Right)
            .with_choice("Listen to her latest piece", "listen_music", None)
            .with_choice("Ask about the project", "music_project", None),
    );
    engine.add_scene(
        Scene::new("Soft arpeggios ripple like water over stones.")
            .with_id("listen_music")
            .with_background("music_room")
            .with_next("first_choice"),
    );
    engine.add_scene(
        Scene::new("Every creature gets its own motif, Lily explains.")
            .with_id("music_project")
            .with_character("lily")
            .with_speaker_name("Lily")
            .with_background("music_room")
            .at(CharacterPosition::Right)
            .with_next("first_choice"),
    );

    // --- manufacturing floor ---
    engine.add_scene(
        Scene::new("Robotic arms sweep in careful arcs across the floor.")
            .with_id("manufacturing")
            .with_background("factory")
            .with_on_enter(Action::set_variable("visited_manufacturing", true)),
    );
    engine.add_scene(
        Scene::new("Ryan here. Mind the yellow lines, the arms don't.")
            .with_id("ryan_intro")
            .with_character("ryan")
            .with_speaker_name("Ryan")
            .with_background("factory")
            .at(CharacterPosition::Left)
            .with_choice("Ask about the robots", "robots", None)
            .with_choice("Ask about the control software", "neural_networks", None),
    );
    engine.add_scene(
        Scene::new("Each arm learned its path from a thousand human demonstrations.")
            .with_id("robots")
            .with_background("factory")
            .with_next("first_choice"),
    );
    engine.add_scene(
        Scene::new("The planner retrains itself every night on the day's misses.")
            .with_id("neural_networks")
            .with_background("factory")
            .with_next("first_choice"),
    );

    // --- residential block ---
    engine.add_scene(
        Scene::new("Quiet corridors, warm light. People actually live here.")
            .with_id("residential")
            .with_background("dormitory")
            .with_on_enter(Action::set_variable("visited_residential", true)),
    );
    engine.add_scene(
        Scene::new("The common room hosts a chess league on Thursdays.")
            .with_id("residential_info")
            .with_character("carter")
            .with_speaker_name("Dr. Carter")
            .with_background("dormitory")
            .with_choice("Peek into the library", "read_book", None)
            .with_choice("Back to the tour", "first_choice", None),
    );
    engine.add_scene(
        Scene::new("You skim a battered paperback about lighthouse keepers.")
            .with_id("read_book")
            .with_background("dormitory")
            .with_next("first_choice"),
    );

    // --- ending ---
    engine.add_scene(
        Scene::new("The sun sets behind the campus as you head for the gates.")
            .with_id("rest")
            .with_background("courtyard"),
    );
    engine.add_scene(
        Scene::new("Come back any time, says Dr. Carter. The end.")
            .with_id("end")
            .with_character("carter")
            .with_speaker_name("Dr. Carter")
            .with_background("courtyard"),
    );
}
