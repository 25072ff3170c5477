//! Session state machine tests
//!
//! Drives the wake/command loop with scripted collaborators

use hark::config::ListenConfig;
use hark::{
    ActionOutcome, Capture, Command, Dispatcher, Error, SessionState, Termination, Utterance,
};
use std::time::Duration;

use tokio::sync::mpsc;

mod common;
use common::{JOKE, TestBed};

const GREETING_LINES: usize = 2;

/// Run a full session with no interrupt source
async fn run(bed: TestBed) -> (Termination, common::Probes) {
    let (mut session, probes) = bed.build();
    let (_tx, mut rx) = mpsc::channel(1);
    let reason = session.run(&mut rx).await;
    (reason, probes)
}

/// Everything spoken after the greeting
fn replies(probes: &common::Probes) -> Vec<String> {
    probes.spoken().split_off(GREETING_LINES)
}

#[tokio::test]
async fn test_ambient_speech_is_ignored() {
    for phrase in ["what a nice day", "python is great", "hello there", "open google"] {
        let (mut session, probes) = TestBed::new().heard([phrase]).build();

        let next = session.step(SessionState::AwaitingWake).await;

        assert_eq!(next, SessionState::AwaitingWake, "{phrase}");
        assert!(probes.spoken().is_empty(), "{phrase}");
        assert!(probes.opened().is_empty(), "{phrase}");
    }
}

#[tokio::test]
async fn test_silence_and_inaudible_are_quiet() {
    let (reason, probes) = run(TestBed::new()
        .capture(Capture::NoSpeech)
        .capture(Capture::Inaudible)
        .heard(["shutdown"]))
    .await;

    assert_eq!(reason, Termination::EmergencyStop);
    assert_eq!(replies(&probes), vec!["Shutting down. Bye."]);
}

#[tokio::test]
async fn test_shutdown_needs_no_wake_phrase() {
    let (mut session, probes) = TestBed::new().heard(["shutdown"]).build();
    let next = session.step(SessionState::AwaitingWake).await;
    assert_eq!(next, SessionState::Terminated(Termination::EmergencyStop));
    assert_eq!(probes.spoken(), vec!["Shutting down. Bye."]);

    let (mut session, _) = TestBed::new().heard(["please exit program"]).build();
    let next = session.step(SessionState::AwaitingCommand).await;
    assert_eq!(next, SessionState::Terminated(Termination::EmergencyStop));
}

#[tokio::test]
async fn test_terminated_is_absorbing() {
    let (mut session, probes) = TestBed::new().build();
    let state = SessionState::Terminated(Termination::Farewell);
    assert_eq!(session.step(state).await, state);
    assert!(probes.windows().is_empty());
}

#[tokio::test]
async fn test_wake_moves_to_awaiting_command() {
    let (mut session, probes) = TestBed::new().heard(["well hey python"]).build();

    let next = session.step(SessionState::AwaitingWake).await;

    assert_eq!(next, SessionState::AwaitingCommand);
    assert_eq!(probes.spoken(), vec!["Yes, I am listening. How can I help?"]);
}

#[tokio::test]
async fn test_empty_command_reprompts_without_action() {
    let (mut session, probes) = TestBed::new().capture(Capture::NoSpeech).build();

    let next = session.step(SessionState::AwaitingCommand).await;

    assert_eq!(next, SessionState::AwaitingWake);
    assert_eq!(probes.spoken(), vec!["I didn't catch that. Please say again."]);
    assert!(probes.opened().is_empty());
    assert!(probes.queries().is_empty());
}

#[tokio::test]
async fn test_channel_error_is_reported_and_loop_continues() {
    let (reason, probes) = run(TestBed::new()
        .capture(Capture::ChannelError("connection refused".to_string()))
        .heard(["hello python", "tell me a joke", "shutdown"]))
    .await;

    assert_eq!(reason, Termination::EmergencyStop);
    assert_eq!(
        replies(&probes),
        vec![
            "Network/API error. Check your internet connection.",
            "Yes, I am listening. How can I help?",
            JOKE,
            "Shutting down. Bye.",
        ]
    );
}

#[tokio::test]
async fn test_greeting_by_hour() {
    for (hour, salutation) in [(9, "Good morning!"), (14, "Good afternoon!"), (21, "Good evening!")] {
        let (mut session, probes) = TestBed::new().at(hour, 0).build();
        session.greet().await;
        assert_eq!(
            probes.spoken(),
            vec![
                salutation.to_string(),
                "I am your assistant. Say 'hello python' to activate me.".to_string(),
            ]
        );
    }
}

#[tokio::test]
async fn test_query_time() {
    let (_, probes) = run(TestBed::new()
        .at(14, 5)
        .heard(["hello python", "what time is it", "shutdown"]))
    .await;

    assert!(probes.said("The time is 02:05 PM"));
}

#[tokio::test]
async fn test_lookup_with_subject() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "wikipedia alan turing", "shutdown"])).await;

    assert_eq!(probes.queries(), vec!["alan turing"]);
    assert_eq!(
        replies(&probes)[1..4],
        [
            "Searching Wikipedia...",
            "According to Wikipedia",
            "Summary of alan turing in 2 sentences.",
        ]
    );
}

#[tokio::test]
async fn test_lookup_outranks_media() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "wikipedia open youtube", "shutdown"])).await;

    assert_eq!(probes.queries(), vec!["open youtube"]);
    assert!(probes.opened().is_empty());
}

#[tokio::test]
async fn test_lookup_asks_for_subject() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "wikipedia", "rust", "shutdown"])).await;

    assert_eq!(probes.queries(), vec!["rust"]);
    assert_eq!(
        replies(&probes)[1..5],
        [
            "Searching Wikipedia...",
            "What should I search on Wikipedia?",
            "According to Wikipedia",
            "Summary of rust in 2 sentences.",
        ]
    );
}

#[tokio::test]
async fn test_lookup_with_empty_follow_up_fails_gracefully() {
    let (reason, probes) = run(TestBed::new()
        .heard(["hey python", "wikipedia"])
        .capture(Capture::NoSpeech)
        .heard(["hey python", "joke", "shutdown"]))
    .await;

    assert_eq!(probes.queries(), vec![""]);
    assert!(probes.said("Sorry, I couldn't fetch from Wikipedia."));
    // The loop carried on to the next cycle
    assert!(probes.said(JOKE));
    assert_eq!(reason, Termination::EmergencyStop);
}

#[tokio::test]
async fn test_lookup_failure_is_spoken() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "wikipedia nonexistent thing", "shutdown"])).await;

    assert!(probes.said("Sorry, I couldn't fetch from Wikipedia."));
    assert!(!probes.said("According to Wikipedia"));
}

#[tokio::test]
async fn test_play_media() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "play youtube", "lofi beats", "shutdown"])).await;

    assert!(probes.said("What should I play on YouTube?"));
    assert_eq!(
        probes.opened(),
        vec!["https://www.youtube.com/results?search_query=lofi+beats"]
    );
    assert!(probes.said("Playing lofi beats on YouTube"));
}

#[tokio::test]
async fn test_play_media_without_query() {
    let (_, probes) = run(TestBed::new()
        .heard(["hello python", "open youtube"])
        .capture(Capture::Inaudible)
        .heard(["shutdown"]))
    .await;

    assert!(probes.said("No query provided."));
    assert!(probes.opened().is_empty());
}

#[tokio::test]
async fn test_emergency_stop_during_follow_up() {
    let (reason, probes) = run(TestBed::new().heard(["hello python", "play youtube", "shutdown now"])).await;

    assert_eq!(reason, Termination::EmergencyStop);
    assert!(probes.opened().is_empty());
}

#[tokio::test]
async fn test_open_google() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "open google", "shutdown"])).await;

    assert_eq!(probes.opened(), vec!["https://www.google.com"]);
    assert!(probes.said("Opening Google"));
}

#[tokio::test]
async fn test_open_arbitrary_site() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "please open github", "shutdown"])).await;

    assert_eq!(probes.opened(), vec!["https://github.com"]);
    assert!(probes.said("Opening github.com"));
}

#[tokio::test]
async fn test_open_without_site_is_reported() {
    let (reason, probes) = run(TestBed::new().heard(["hello python", "please open", "shutdown"])).await;

    assert!(probes.opened().is_empty());
    assert!(probes.said("Sorry I couldn't open that site."));
    assert_eq!(reason, Termination::EmergencyStop);
}

#[tokio::test]
async fn test_joke() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "tell me a joke", "shutdown"])).await;
    assert!(probes.said(JOKE));
}

#[tokio::test]
async fn test_dictate() {
    let (_, probes) = run(TestBed::new()
        .heard(["hello python", "type something", "shutdown"])
        .typed(Ok(Some("  Hello, World  ".to_string()))))
    .await;

    assert_eq!(probes.prompts(), vec!["Text to speak: "]);
    assert!(probes.said("Please type the text you want me to speak. Press Enter when done."));
    assert!(probes.said("Hello, World"));
}

#[tokio::test]
async fn test_dictate_without_text() {
    let (_, probes) = run(TestBed::new()
        .heard(["hello python", "text to speech", "hello python", "type", "shutdown"])
        .typed(Ok(Some("   ".to_string())))
        .typed(Ok(None)))
    .await;

    let no_text = probes.spoken().iter().filter(|s| *s == "No text provided.").count();
    assert_eq!(no_text, 2);
}

#[tokio::test]
async fn test_dictate_read_error() {
    let (reason, probes) = run(TestBed::new()
        .heard(["hello python", "type", "shutdown"])
        .typed(Err("stdin closed".to_string())))
    .await;

    assert!(probes.said("Sorry, I couldn't read that text."));
    assert_eq!(reason, Termination::EmergencyStop);
}

#[tokio::test]
async fn test_quit_says_goodbye() {
    let (reason, probes) = run(TestBed::new().heard(["hello python", "quit"])).await;

    assert_eq!(reason, Termination::Farewell);
    assert!(reason.is_graceful());
    assert_eq!(replies(&probes).last().map(String::as_str), Some("Goodbye!"));
}

#[tokio::test]
async fn test_unrecognized_command() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "sing a song", "shutdown"])).await;

    assert!(probes.said(
        "I didn't understand that command. Try: wikipedia, open youtube, time, joke, quit."
    ));
}

#[tokio::test]
async fn test_interrupt_stops_session() {
    let (mut session, probes) = TestBed::new().heard(["hello python"]).build();
    let (tx, mut rx) = mpsc::channel(1);
    tx.send(()).await.unwrap();

    let reason = session.run(&mut rx).await;

    assert_eq!(reason, Termination::Interrupted);
    assert_eq!(
        replies(&probes),
        vec!["Interrupted by user. Exiting."]
    );
}

#[tokio::test]
async fn test_listen_windows_per_phase() {
    let (_, probes) = run(TestBed::new().heard(["hello python", "play youtube", "jazz", "shutdown"])).await;

    let listen = ListenConfig::default();
    assert_eq!(
        probes.windows(),
        vec![listen.wake, listen.command, listen.follow_up, listen.wake]
    );
}

#[tokio::test]
async fn test_dispatch_rejects_missing_follow_up() {
    let (mut services, probes) = TestBed::new().collaborators();
    let command = Command::new(Utterance::new("play youtube").unwrap());

    let result = Dispatcher::default().dispatch(&command, &mut services).await;

    assert!(matches!(result, Err(Error::Dispatch(_))));
    assert!(probes.opened().is_empty());
}

#[tokio::test]
async fn test_dispatch_uses_follow_up_as_query() {
    let (mut services, probes) = TestBed::new().collaborators();
    let command =
        Command::new(Utterance::new("wikipedia").unwrap()).with_follow_up("ferris".to_string());

    let outcome = Dispatcher::new(3).dispatch(&command, &mut services).await.unwrap();

    assert_eq!(outcome, ActionOutcome::Continue);
    assert!(probes.said("Summary of ferris in 3 sentences."));
}

#[tokio::test]
async fn test_dispatch_error_is_a_fault() {
    let (mut session, probes) = TestBed::new().build();
    let command = Command::new(Utterance::new("play youtube").unwrap());

    let next = session.execute(&command).await;

    assert_eq!(next, SessionState::Terminated(Termination::Fault));
    assert!(!Termination::Fault.is_graceful());
    assert_eq!(
        probes.spoken(),
        vec!["An error occurred. Check the console for details."]
    );
    assert!(probes.opened().is_empty());
}

#[tokio::test]
async fn test_execute_prepared_command() {
    let (mut session, probes) = TestBed::new().build();
    let command =
        Command::new(Utterance::new("play youtube").unwrap()).with_follow_up("jazz".to_string());

    let next = session.execute(&command).await;

    assert_eq!(next, SessionState::AwaitingWake);
    assert!(probes.said("Playing jazz on YouTube"));
}

#[tokio::test]
async fn test_interrupt_while_typing() {
    let (mut session, probes) = TestBed::new()
        .heard(["hello python", "type"])
        .stalled_typing()
        .build();
    let (tx, mut rx) = mpsc::channel(1);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let _ = tx.send(()).await;
    });

    let reason = session.run(&mut rx).await;

    assert_eq!(reason, Termination::Interrupted);
    assert_eq!(probes.prompts(), vec!["Text to speak: "]);
    assert_eq!(
        replies(&probes).last().map(String::as_str),
        Some("Interrupted by user. Exiting.")
    );
}
