use std::sync::{Arc, Mutex};

use kanal::AsyncReceiver;
use wordbook_types::{Definition, ExamplePair, LookupResult, LookupState, PartOfSpeech, Translation};

use super::{ScriptedTransport, drain, loading, result_event, settle, text_event};
use crate::controller::{LookupController, LookupOptions};
use crate::error::{LOOKUP_FAILED, LookupError, PARSE_FAILED};

const HELLO_JSON: &str = r#"{"definitions":[{"definition":"used as a greeting","partOfSpeech":"interjection","exampleSentences":["Hello there!"]}],"translations":[{"translation":"привет","partOfSpeech":null,"examples":[{"en":"Hello there!","ru":"Привет!"}]}]}"#;

type Errors = Arc<Mutex<Vec<String>>>;

fn controller(
    transport: &Arc<ScriptedTransport>,
) -> (LookupController, AsyncReceiver<LookupState>, Errors) {
    let errors: Errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();

    let (controller, rx) = LookupController::new(transport.clone(), LookupOptions::default());
    let controller = controller.with_error_callback(move |message| {
        sink.lock().unwrap().push(message.to_string());
    });

    (controller, rx, errors)
}

fn hello_result() -> LookupResult {
    LookupResult {
        definitions: vec![Definition {
            text: "used as a greeting".to_string(),
            part_of_speech: Some(PartOfSpeech::Interjection),
            examples: vec!["Hello there!".to_string()],
        }],
        translations: vec![Translation {
            text: "привет".to_string(),
            part_of_speech: None,
            examples: vec![ExamplePair {
                source: "Hello there!".to_string(),
                target: "Привет!".to_string(),
            }],
        }],
    }
}

#[tokio::test(start_paused = true)]
async fn test_short_words_never_issue_requests() {
    let transport = ScriptedTransport::new();
    let (controller, rx, _) = controller(&transport);

    for word in ["", "a", " b ", "  "] {
        controller.set_word(word);
        assert_eq!(controller.state(), LookupState::Idle);
        assert!(!controller.is_pending());
    }

    settle(2_000).await;
    assert!(transport.requests().is_empty());
    assert!(drain(&rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_word_is_recorded_before_debounce() {
    let transport = ScriptedTransport::new();
    let (controller, _rx, _) = controller(&transport);

    controller.set_word("Hello ");
    assert_eq!(controller.word(), "Hello ");
    assert_eq!(controller.state(), LookupState::Idle);
    assert!(controller.is_pending());

    settle(499).await;
    assert!(transport.requests().is_empty());

    settle(10).await;
    assert_eq!(transport.requests(), vec!["Hello"]);
}

#[tokio::test(start_paused = true)]
async fn test_busy_until_lookup_settles() {
    let transport = ScriptedTransport::new();
    let tx = transport.live("seal");
    let (controller, _rx, _) = controller(&transport);
    assert!(!controller.is_busy());

    controller.set_word("seal");
    assert!(controller.is_busy());

    settle(600).await;
    assert!(controller.is_busy());

    tx.send(Ok(result_event(HELLO_JSON).into_bytes())).unwrap();
    settle(10).await;
    assert!(!controller.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_looks_up_last_word_only() {
    let transport = ScriptedTransport::new();
    let (controller, _rx, _) = controller(&transport);

    for word in ["s", "se", "sea", "seal"] {
        controller.set_word(word);
        settle(100).await;
    }
    settle(600).await;

    assert_eq!(transport.requests(), vec!["seal"]);
}

#[tokio::test(start_paused = true)]
async fn test_streamed_text_then_result() {
    let transport = ScriptedTransport::new();
    transport.respond(
        "hello",
        &[text_event("Hel"), text_event("lo"), result_event(HELLO_JSON)],
    );
    let (controller, rx, errors) = controller(&transport);

    controller.set_word("hello");
    settle(600).await;

    let states = drain(&rx);
    assert_eq!(
        states,
        vec![
            loading(""),
            loading("Hel"),
            loading("Hello"),
            LookupState::Success {
                result: hello_result()
            },
        ]
    );
    assert_eq!(controller.state().result(), Some(&hello_result()));
    assert!(errors.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sea_scenario() {
    let transport = ScriptedTransport::new();
    transport.respond(
        "se",
        &[
            text_event("Sea..."),
            result_event(
                r#"{"definitions":[{"definition":"a large body of water","partOfSpeech":"noun","exampleSentences":["The sea was calm."]}],"translations":[]}"#,
            ),
        ],
    );
    let (controller, rx, _) = controller(&transport);

    controller.set_word("se");
    settle(600).await;

    let expected = LookupResult {
        definitions: vec![Definition {
            text: "a large body of water".to_string(),
            part_of_speech: Some(PartOfSpeech::Noun),
            examples: vec!["The sea was calm.".to_string()],
        }],
        translations: vec![],
    };
    assert_eq!(
        drain(&rx),
        vec![
            loading(""),
            loading("Sea..."),
            LookupState::Success { result: expected },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_partial_text_only_grows() {
    let transport = ScriptedTransport::new();
    let tx = transport.live("ocean");
    let (controller, rx, _) = controller(&transport);

    controller.set_word("ocean");
    settle(600).await;
    for fragment in ["An ", "ocean ", "is ", "a ", "very ", "large ", "sea."] {
        tx.send(Ok(text_event(fragment).into_bytes())).unwrap();
        settle(1).await;
    }

    let texts: Vec<String> = drain(&rx)
        .into_iter()
        .filter_map(|state| state.partial_text().map(str::to_string))
        .collect();

    assert_eq!(texts.len(), 8);
    for pair in texts.windows(2) {
        assert!(pair[1].starts_with(&pair[0]));
        assert!(pair[1].len() > pair[0].len());
    }
    assert_eq!(texts.last().unwrap(), "An ocean is a very large sea.");
}

#[tokio::test(start_paused = true)]
async fn test_stream_without_result_is_empty() {
    let transport = ScriptedTransport::new();
    transport.respond("zzyzx", &[text_event("No entries for "), text_event("zzyzx")]);
    let (controller, _rx, errors) = controller(&transport);

    controller.set_word("zzyzx");
    settle(600).await;

    assert_eq!(controller.state(), LookupState::Empty);
    assert!(errors.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_result_payload_is_an_error() {
    let transport = ScriptedTransport::new();
    transport.respond(
        "cat",
        &[text_event("Cat"), result_event("{\"definitions\": [oops")],
    );
    let (controller, _rx, errors) = controller(&transport);

    controller.set_word("cat");
    settle(600).await;

    assert_eq!(
        controller.state(),
        LookupState::Error {
            message: PARSE_FAILED.to_string()
        }
    );
    assert_eq!(*errors.lock().unwrap(), vec![PARSE_FAILED]);
}

#[tokio::test(start_paused = true)]
async fn test_events_after_terminal_state_are_dropped() {
    let transport = ScriptedTransport::new();
    transport.respond(
        "hello",
        &[
            result_event(HELLO_JSON),
            text_event("trailing"),
            result_event("{\"definitions\": []}"),
        ],
    );
    let (controller, rx, _) = controller(&transport);

    controller.set_word("hello");
    settle(600).await;

    assert_eq!(
        drain(&rx),
        vec![
            loading(""),
            LookupState::Success {
                result: hello_result()
            }
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_reports_once() {
    let transport = ScriptedTransport::new();
    transport.fail(
        "cat",
        LookupError::Status {
            status: 500,
            message: "internal error".to_string(),
        },
    );
    let (controller, _rx, errors) = controller(&transport);

    controller.set_word("cat");
    settle(600).await;

    assert_eq!(
        controller.state(),
        LookupState::Error {
            message: LOOKUP_FAILED.to_string()
        }
    );
    assert_eq!(*errors.lock().unwrap(), vec![LOOKUP_FAILED]);
}

#[tokio::test(start_paused = true)]
async fn test_failure_mid_stream() {
    let transport = ScriptedTransport::new();
    let tx = transport.live("cat");
    let (controller, _rx, errors) = controller(&transport);

    controller.set_word("cat");
    settle(600).await;
    tx.send(Ok(text_event("Ca").into_bytes())).unwrap();
    tx.send(Err(LookupError::NoBody)).unwrap();
    settle(10).await;

    assert_eq!(
        controller.state(),
        LookupState::Error {
            message: LOOKUP_FAILED.to_string()
        }
    );
    assert_eq!(errors.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_error_is_silent() {
    let transport = ScriptedTransport::new();
    transport.fail("cat", LookupError::Cancelled);
    let (controller, rx, errors) = controller(&transport);

    controller.set_word("cat");
    settle(600).await;

    assert_eq!(controller.state(), loading(""));
    assert_eq!(drain(&rx), vec![loading("")]);
    assert!(errors.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_lookup_never_leaks() {
    let transport = ScriptedTransport::new();
    let cat = transport.live("cat");
    let dog = transport.live("dog");
    let (controller, rx, errors) = controller(&transport);

    controller.set_word("cat");
    settle(600).await;
    cat.send(Ok(text_event("meow").into_bytes())).unwrap();
    settle(1).await;
    assert_eq!(controller.state(), loading("meow"));

    controller.set_word("dog");
    settle(600).await;
    assert_eq!(controller.state(), loading(""));
    assert!(cat.is_closed(), "superseded stream should be dropped");

    let _ = cat.send(Ok(text_event("late").into_bytes()));
    let _ = cat.send(Ok(result_event(HELLO_JSON).into_bytes()));
    dog.send(Ok(text_event("woof").into_bytes())).unwrap();
    settle(10).await;

    assert_eq!(controller.state(), loading("woof"));
    assert_eq!(transport.requests(), vec!["cat", "dog"]);

    let states = drain(&rx);
    let dog_start = states.iter().rposition(|s| *s == loading("")).unwrap();
    assert_eq!(&states[dog_start..], &[loading(""), loading("woof")]);
    assert!(
        !states
            .iter()
            .any(|s| s.partial_text().is_some_and(|t| t.contains("late")) || s.is_terminal())
    );
    assert!(errors.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_new_word_after_terminal_restarts_lineage() {
    let transport = ScriptedTransport::new();
    transport.respond("zzyzx", &[]);
    transport.respond("hello", &[result_event(HELLO_JSON)]);
    let (controller, rx, _) = controller(&transport);

    controller.set_word("zzyzx");
    settle(600).await;
    controller.set_word("hello");
    settle(600).await;

    assert_eq!(
        drain(&rx),
        vec![
            loading(""),
            LookupState::Empty,
            loading(""),
            LookupState::Success {
                result: hello_result()
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_short_word_cancels_in_flight_lookup() {
    let transport = ScriptedTransport::new();
    let tx = transport.live("cat");
    let (controller, rx, _) = controller(&transport);

    controller.set_word("cat");
    settle(600).await;
    controller.set_word("c");
    assert_eq!(controller.state(), LookupState::Idle);

    settle(10).await;
    assert!(tx.is_closed());
    assert_eq!(drain(&rx), vec![loading(""), LookupState::Idle]);
}

#[tokio::test(start_paused = true)]
async fn test_clear_stops_everything() {
    let transport = ScriptedTransport::new();
    let tx = transport.live("seal");
    let (controller, rx, errors) = controller(&transport);

    controller.set_word("seal");
    settle(600).await;
    tx.send(Ok(text_event("Se").into_bytes())).unwrap();
    settle(1).await;

    controller.clear();
    assert_eq!(controller.state(), LookupState::Idle);
    assert_eq!(controller.word(), "");
    drain(&rx);

    let _ = tx.send(Ok(text_event("al").into_bytes()));
    let _ = tx.send(Ok(result_event(HELLO_JSON).into_bytes()));
    settle(10).await;

    assert!(tx.is_closed());
    assert!(drain(&rx).is_empty());
    assert_eq!(controller.state(), LookupState::Idle);
    assert!(errors.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_clear_cancels_pending_debounce() {
    let transport = ScriptedTransport::new();
    let (controller, _rx, _) = controller(&transport);

    controller.set_word("seal");
    settle(100).await;
    controller.reset();
    assert!(!controller.is_pending());

    settle(1_000).await;
    assert!(transport.requests().is_empty());
    assert_eq!(controller.state(), LookupState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_drop_closes_stream() {
    let transport = ScriptedTransport::new();
    let tx = transport.live("seal");
    let (controller, _rx, _) = controller(&transport);

    controller.set_word("seal");
    settle(600).await;
    assert!(!tx.is_closed());

    drop(controller);
    settle(10).await;
    assert!(tx.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_disposed_controller_ignores_input() {
    let transport = ScriptedTransport::new();
    let (controller, _rx, _) = controller(&transport);

    controller.dispose();
    controller.set_word("seal");
    settle(1_000).await;

    assert!(transport.requests().is_empty());
    assert_eq!(controller.word(), "");
}
