/// Story traversal integration tests — graph, conditions, and variables
/// working together on a realistic branching story.

use fable_engine::core::graph::{Advance, SceneGraph, StoryError};
use fable_engine::core::variables::VariableStore;
use fable_engine::schema::condition::Condition;
use fable_engine::schema::scene::{Action, Scene};
use fable_engine::schema::value::Value;

/// A campus-tour story: three optional wings set a flag each, and the
/// final choice only appears once all three flags hold.
fn campus_tour() -> SceneGraph {
    let gate = Condition::parse_ron(
        r#"(
            variable: "visited_music",
            equals: true,
            and: [
                (variable: "visited_workshop", equals: true),
                (variable: "visited_garden", equals: true),
            ],
        )"#,
    )
    .unwrap();

    let mut graph = SceneGraph::new();
    graph.add(Scene::new("Welcome to the campus.").with_id("start"));
    graph.add(
        Scene::new("Where would you like to go?")
            .with_id("hub")
            .with_choice("The music hall", "music", None)
            .with_choice("The workshop", "workshop", None)
            .with_choice("The garden", "garden", None)
            .with_choice("Head home", "finale", Some(gate)),
    );
    graph.add(
        Scene::new("A piano rings out.")
            .with_id("music")
            .with_on_enter(Action::set_variable("visited_music", true))
            .with_next("hub"),
    );
    graph.add(
        Scene::new("Sawdust everywhere.")
            .with_id("workshop")
            .with_on_enter(Action::set_variable("visited_workshop", true))
            .with_next("hub"),
    );
    graph.add(
        Scene::new("Rows of tomatoes.")
            .with_id("garden")
            .with_on_enter(Action::set_variable("visited_garden", true))
            .with_next("hub"),
    );
    graph.add(Scene::new("What a day.").with_id("finale"));
    graph
}

#[test]
fn gated_choice_appears_only_after_all_flags() {
    let mut graph = campus_tour();
    let mut vars = VariableStore::new();
    graph.validate().unwrap();

    graph.jump("hub", &mut vars).unwrap();
    let texts: Vec<&str> = graph
        .visible_choices(&vars)
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    assert_eq!(texts, vec!["The music hall", "The workshop", "The garden"]);

    for wing in ["music", "workshop", "garden"] {
        graph.jump(wing, &mut vars).unwrap();
        assert_eq!(graph.advance(&mut vars).unwrap(), Advance::Moved);
        assert_eq!(graph.current().unwrap().id.as_deref(), Some("hub"));
    }

    // authored order survives filtering, the gated choice comes last
    let texts: Vec<&str> = graph
        .visible_choices(&vars)
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec!["The music hall", "The workshop", "The garden", "Head home"]
    );
}

#[test]
fn partial_progress_keeps_the_gate_shut() {
    let mut graph = campus_tour();
    let mut vars = VariableStore::new();
    graph.jump("music", &mut vars).unwrap();
    graph.jump("garden", &mut vars).unwrap();
    graph.jump("hub", &mut vars).unwrap();
    assert_eq!(graph.visible_choices(&vars).len(), 3);
}

#[test]
fn on_enter_reruns_on_every_visit() {
    let mut graph = SceneGraph::new();
    graph.add(Scene::new("lobby").with_id("lobby"));
    graph.add(
        Scene::new("classroom")
            .with_id("classroom")
            .with_on_enter(Action::set_variable("in_class", true)),
    );
    let mut vars = VariableStore::new();

    graph.jump("classroom", &mut vars).unwrap();
    assert_eq!(vars.get("in_class"), Some(&Value::from(true)));

    vars.set("in_class", false);
    graph.jump("lobby", &mut vars).unwrap();
    graph.jump("classroom", &mut vars).unwrap();
    assert_eq!(vars.get("in_class"), Some(&Value::from(true)));
}

#[test]
fn malformed_condition_never_hides_a_choice() {
    // no variable on the node: vacuously true
    let vacuous = Condition::parse_ron("(equals: true)").unwrap();
    let mut graph = SceneGraph::new();
    graph.add(
        Scene::new("pick")
            .with_id("pick")
            .with_choice("Always there", "after", Some(vacuous)),
    );
    graph.add(Scene::new("after").with_id("after"));
    let vars = VariableStore::new();
    graph.jump("pick", &mut VariableStore::new()).unwrap();
    assert_eq!(graph.visible_choices(&vars).len(), 1);
}

#[test]
fn all_choices_filtered_out_falls_back_to_linear_advance() {
    let gate = Condition::var_equals("has_key", true);
    let mut graph = SceneGraph::new();
    graph.add(
        Scene::new("door")
            .with_id("door")
            .with_choice("Unlock", "inside", Some(gate)),
    );
    graph.add(Scene::new("hallway").with_id("hallway"));
    graph.add(Scene::new("inside").with_id("inside"));
    let mut vars = VariableStore::new();

    assert_eq!(graph.advance(&mut vars).unwrap(), Advance::Moved);
    assert_eq!(graph.current().unwrap().id.as_deref(), Some("hallway"));

    // with the key, the same scene opens its choices instead
    let mut graph2 = campus_tour();
    let mut vars2 = VariableStore::new();
    graph2.jump("hub", &mut vars2).unwrap();
    assert_eq!(graph2.advance(&mut vars2).unwrap(), Advance::ChoicesOpen);
}

#[test]
fn unknown_jump_target_reports_the_id() {
    let mut graph = campus_tour();
    let mut vars = VariableStore::new();
    assert_eq!(
        graph.jump("cafeteria", &mut vars).unwrap_err(),
        StoryError::SceneNotFound("cafeteria".to_string())
    );
    assert_eq!(graph.current().unwrap().id.as_deref(), Some("start"));
}

#[test]
fn retreat_is_positional_after_branching() {
    let mut graph = campus_tour();
    let mut vars = VariableStore::new();
    graph.jump("garden", &mut vars).unwrap();
    assert!(graph.retreat());
    // predecessor in authored order, not the scene jumped from
    assert_eq!(graph.current().unwrap().id.as_deref(), Some("workshop"));
}

#[test]
fn numeric_conditions_compare_across_int_and_float() {
    let mut graph = SceneGraph::new();
    graph.add(
        Scene::new("trial")
            .with_id("trial")
            .with_choice(
                "Claim the prize",
                "prize",
                Some(Condition::var_greater_than("score", 2)),
            ),
    );
    graph.add(Scene::new("prize").with_id("prize"));
    let mut vars = VariableStore::new();

    vars.set("score", 2.5);
    assert!(graph.visible_choices(&vars).is_empty());
    vars.set("score", 2.01 + 1.0);
    assert_eq!(graph.visible_choices(&vars).len(), 1);
}
