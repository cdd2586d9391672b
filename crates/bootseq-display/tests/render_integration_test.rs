//! Integration tests for compositing and recording a container.

use bootseq_core::{
    Bounds, Dimensions, Error, Line, LineKind, Placement, Position, PromptStyle, SequenceEvent,
};
use bootseq_display::{AnimationContainer, Canvas, SequenceRecorder, TerminalWindow};
use tokio::sync::broadcast;

fn main_window() -> TerminalWindow {
    TerminalWindow::main(
        "xiaoOS v2.1 - Main Terminal",
        Placement::main(Position::origin()),
        Dimensions::new(24, 80),
    )
}

#[test]
fn test_explosion_window_occludes_main() {
    let container = AnimationContainer::new(Dimensions::new(24, 80));
    let style = PromptStyle::default();

    let main = container.mount(main_window()).unwrap();
    let weak = container.downgrade();
    weak.window(main)
        .append_line(style.format(LineKind::System, "main", "Boot complete"))
        .unwrap();

    let breach = TerminalWindow::explosion(
        "Security Breach",
        "breach",
        Placement::new(Position::new(40, 0), 1, 15),
        Dimensions::new(6, 30),
    );
    let breach = container.mount(breach).unwrap();
    weak.window(breach)
        .append_line(Line::new(LineKind::Glyph, "0101ABCD"))
        .unwrap();

    let canvas = Canvas::render(&container.snapshot());
    let text = canvas.to_plain_text();
    assert!(text.contains("Security Breach"));
    assert!(text.contains("0101ABCD"));
    assert!(text.contains("[SYSTEM] Boot"));

    // The explosion window's border covers the main window beneath it
    assert_eq!(canvas.cell(40, 0), Some('┌'));
    assert_eq!(canvas.cell(0, 0), Some('╔'));
    let covered = canvas.extract_text(&Bounds::new(41, 1, 10, 1));
    assert_eq!(covered, "0101ABCD");
}

#[test]
fn test_pending_line_visible_until_committed() {
    let container = AnimationContainer::new(Dimensions::new(24, 80));
    let style = PromptStyle::default();
    let main = container.downgrade().window(container.mount(main_window()).unwrap());

    main.set_pending(style.format_partial(LineKind::Loading, "main", "Loading ker"))
        .unwrap();
    let text = Canvas::render(&container.snapshot()).to_plain_text();
    assert!(text.contains("root@xiaoOS-main:~$ Loading ker ..._"));
    assert_eq!(main.line_count().unwrap(), 0);

    main.commit_pending(style.format(LineKind::Loading, "main", "Loading kernel"))
        .unwrap();
    let text = Canvas::render(&container.snapshot()).to_plain_text();
    assert!(text.contains("root@xiaoOS-main:~$ Loading kernel ..."));
    assert!(!text.contains("Loading ker ..._"));
    assert_eq!(main.line_count().unwrap(), 1);
}

#[tokio::test]
async fn test_container_events_recorded() {
    let (events, mut rx) = broadcast::channel(64);
    let container = AnimationContainer::with_events(Dimensions::new(24, 80), events);
    let main = container.downgrade().window(container.mount(main_window()).unwrap());
    main.append_line(Line::plain("hello")).unwrap();
    assert_eq!(container.destroy(), 1);

    let mut recorder = SequenceRecorder::with_title(Dimensions::new(24, 80), "render");
    while let Ok(event) = rx.try_recv() {
        recorder.record(&event);
    }

    let codes: Vec<&str> = recorder.events().iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["w", "o", "w"]);
    assert!(recorder.events()[0].data.starts_with("+xiaoOS v2.1 - Main Terminal@"));
    assert_eq!(recorder.events()[1].data, "hello\r\n");
}

#[test]
fn test_destroyed_container_rejects_stale_refs() {
    let (events, _rx) = broadcast::channel::<SequenceEvent>(16);
    let container = AnimationContainer::with_events(Dimensions::new(24, 80), events);
    let weak = container.downgrade();
    let main = weak.window(container.mount(main_window()).unwrap());

    container.destroy();
    assert!(matches!(
        main.append_line(Line::plain("late")),
        Err(Error::ContainerDestroyed)
    ));
    assert!(matches!(weak.snapshot(), Err(Error::ContainerDestroyed)));

    drop(container);
    assert!(!weak.is_alive());
    assert!(!main.is_alive());
}
