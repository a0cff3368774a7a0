//! Whole sessions driven through a virtual terminal.

use inquiry::{
    create_prompt_module,
    prompts::InputPrompt,
    registry::{global_registry, register_prompt, restore_default_prompts},
    ui::text::strip_ansi,
    Answers, BottomBar, Console, Error, Prompt, PromptContext, PromptModule, Question, Result,
    Validation,
};
use serde_json::{json, Value};
use std::{
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// A module whose `input` type counts how often it is rendered.
fn counting_module(console: Console) -> (PromptModule, Arc<AtomicUsize>) {
    let renders = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&renders);
    let mut module = create_prompt_module().with_console(console);
    module.register_prompt("input", move |ctx: PromptContext| -> Result<Box<dyn Prompt>> {
        counter.fetch_add(1, Ordering::SeqCst);
        InputPrompt::create(ctx)
    });
    (module, renders)
}

fn proceed_then_name() -> Vec<Question> {
    vec![
        Question::confirm("ok").message("Proceed?").default(true),
        Question::input("n")
            .message("Name?")
            .when_with(|answers| Ok(answers.get("ok") == Some(&json!(true))))
            .validate(|value, _| match value.as_str() {
                Some(s) if !s.is_empty() => Validation::Valid,
                _ => Validation::Message("required".into()),
            }),
    ]
}

#[test_log::test(tokio::test)]
async fn confirmed_then_named_after_one_rejection() {
    let (console, terminal) = Console::virtual_terminal(80);
    terminal.press_named("return").submit("").submit("Ada");
    let (module, renders) = counting_module(console);

    let answers = module.prompt(proceed_then_name()).await.unwrap();

    assert_eq!(answers.to_json(), json!({"ok": true, "n": "Ada"}));
    assert_eq!(renders.load(Ordering::SeqCst), 2);
    assert!(strip_ansi(&terminal.output()).contains(">> required"));
}

#[test_log::test(tokio::test)]
async fn declined_confirmation_skips_the_name() {
    let (console, terminal) = Console::virtual_terminal(80);
    terminal.submit("n");
    let (module, renders) = counting_module(console);

    let answers = module.prompt(proceed_then_name()).await.unwrap();

    assert_eq!(answers.to_json(), json!({"ok": false}));
    assert!(!answers.contains("n"));
    assert_eq!(renders.load(Ordering::SeqCst), 0);
    assert!(!strip_ansi(&terminal.output()).contains("Name?"));
}

#[tokio::test]
async fn one_answer_per_question_in_order() {
    let (console, terminal) = Console::virtual_terminal(80);
    terminal
        .submit("Ada")
        .submit("secret")
        .press_named("down")
        .press_named("return")
        .submit("2")
        .press_named("space")
        .press_named("return")
        .submit("b");
    let questions = vec![
        Question::input("name"),
        Question::password("pin"),
        Question::list("color").choices(["red", "green"]),
        Question::rawlist("size").choices(["s", "m", "l"]),
        Question::checkbox("toppings").choices(["ham", "egg"]),
        Question::expand("drink").choices([
            inquiry::ChoiceOption::new("Beer").key('b'),
            inquiry::ChoiceOption::new("Water").key('w'),
        ]),
    ];

    let answers = PromptModule::new().with_console(console).prompt(questions).await.unwrap();

    assert_eq!(answers.keys().collect::<Vec<_>>(), ["name", "pin", "color", "size", "toppings", "drink"]);
    assert_eq!(
        answers.to_json(),
        json!({
            "name": "Ada",
            "pin": "secret",
            "color": "green",
            "size": "m",
            "toppings": ["ham"],
            "drink": "Beer",
        })
    );
}

#[tokio::test]
async fn nth_input_is_committed_after_n_renders() {
    for n in 1..=4usize {
        let (console, terminal) = Console::virtual_terminal(80);
        for attempt in 1..=n {
            terminal.submit(&"x".repeat(attempt));
        }
        let (module, renders) = counting_module(console);
        let question = Question::input("word").validate(move |value, _| {
            if value.as_str().map_or(0, str::len) >= n {
                Validation::Valid
            } else {
                Validation::Invalid
            }
        });

        let answers = module.prompt(question).await.unwrap();

        assert_eq!(renders.load(Ordering::SeqCst), n);
        assert_eq!(answers.get("word"), Some(&json!("x".repeat(n))));
    }
}

#[tokio::test]
async fn validation_sees_raw_value_and_filter_result_is_stored() {
    let (console, terminal) = Console::virtual_terminal(80);
    terminal.submit("abc").submit("12");
    let question = Question::input("age")
        .validate(|value, _| match value.as_str().map(str::parse::<u32>) {
            Some(Ok(_)) => Validation::Valid,
            _ => Validation::Message("Enter a number".into()),
        })
        .filter(|value, _| {
            Ok(value.as_str().and_then(|s| s.parse::<u32>().ok()).map_or(Value::Null, |n| json!(n)))
        });

    let answers = PromptModule::new().with_console(console).prompt(question).await.unwrap();

    assert_eq!(answers.get("age"), Some(&json!(12)));
    assert!(strip_ansi(&terminal.output()).contains(">> Enter a number"));
}

#[test]
fn registry_isolation() {
    const CUSTOM: &str = "isolation-check";
    let factory = |ctx: PromptContext| InputPrompt::create(ctx);

    let mut local = create_prompt_module();
    local.register_prompt(CUSTOM, factory);
    assert!(local.registry().contains(CUSTOM));
    assert!(!create_prompt_module().registry().contains(CUSTOM));
    assert!(!global_registry().contains(CUSTOM));

    register_prompt(CUSTOM, factory);
    assert!(global_registry().contains(CUSTOM));
    assert!(!create_prompt_module().registry().contains(CUSTOM));

    restore_default_prompts();
    assert!(!global_registry().contains(CUSTOM));
    register_prompt(CUSTOM, factory);
    assert!(global_registry().contains(CUSTOM));
    restore_default_prompts();
}

#[tokio::test]
async fn unknown_type_is_reported_before_drawing() {
    let (console, terminal) = Console::virtual_terminal(80);
    let err = PromptModule::new()
        .with_console(console)
        .prompt(vec![Question::input("a"), Question::new("slider", "b")])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownPromptType { ref kind, .. } if kind == "slider"));
    assert!(terminal.output().is_empty());
}

#[test_log::test(tokio::test)]
async fn interrupt_releases_the_keyboard() {
    let (console, terminal) = Console::virtual_terminal(80);
    terminal.type_text("Ad").interrupt();
    let module = PromptModule::new().with_console(console.clone());

    let err = module.prompt(Question::input("name")).await.unwrap_err();
    assert!(matches!(err, Error::Interrupted));

    terminal.submit("Bea");
    let answers = module.prompt(Question::input("name")).await.unwrap();
    assert_eq!(answers.get("name"), Some(&json!("Bea")));
}

#[tokio::test]
async fn prefilled_and_non_interactive_answers() {
    let (console, terminal) = Console::virtual_terminal(80);
    let prefilled = Answers::from_json(json!({"name": "Ada"}));
    let answers = PromptModule::new()
        .with_console(console)
        .non_interactive(true)
        .prompt_with_answers(
            vec![
                Question::input("name").default("nobody"),
                Question::confirm("admin").default(false),
                Question::input("email"),
            ],
            prefilled,
        )
        .await
        .unwrap();

    assert_eq!(answers.to_json(), json!({"name": "Ada", "admin": false}));
    assert!(terminal.output().is_empty());
}

#[test_log::test(tokio::test)]
async fn bottom_bar_stays_below_log_output() {
    let (console, terminal) = Console::virtual_terminal(40);
    let mut bar = BottomBar::new(&console, "working").unwrap();

    let mut log = bar.log();
    let writer = std::thread::spawn(move || {
        for i in 0..3 {
            writeln!(log, "step {i}").unwrap();
        }
    });
    writer.join().unwrap();
    bar.update_bottom_bar("done").unwrap();
    bar.close();

    let out = strip_ansi(&terminal.output());
    let steps: Vec<_> = (0..3).map(|i| out.find(&format!("step {i}\n")).unwrap()).collect();
    assert!(steps.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(out.trim_end().ends_with("done"));

    // the keyboard is free again
    assert!(inquiry::BaseUi::new(&console).is_ok());
}

#[tokio::test]
async fn answers_feed_later_derivations() {
    let (console, terminal) = Console::virtual_terminal(80);
    terminal.submit("Ada").press_named("return");
    let answers = PromptModule::new()
        .with_console(console)
        .prompt(vec![
            Question::input("first"),
            Question::input("greeting").default_with(|answers| {
                let first = answers.get("first").and_then(Value::as_str).unwrap_or_default();
                Ok(json!(format!("Hello {first}")))
            }),
        ])
        .await
        .unwrap();
    assert_eq!(answers.get("greeting"), Some(&json!("Hello Ada")));
}
