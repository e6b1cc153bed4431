#[path = "common/fixture.rs"]
mod fixture;

use runtime::input::{InputBridge, KeyQueue, KEY_QUEUE_CAPACITY};
use runtime::KeyEvent;
use types::device::KEY_STATES_LEN;
use types::keys::{self, scancode};

fn blank_frame(rt: &runtime::Runtime<hostkernel::HostKernel>) -> Vec<u32> {
    vec![0u32; rt.config.width * rt.config.height]
}

fn drain(rt: &mut runtime::Runtime<hostkernel::HostKernel>) -> Vec<KeyEvent> {
    std::iter::from_fn(|| rt.get_key()).collect()
}

#[test]
fn test_identical_snapshots_queue_nothing() {
    println!("=== Testing snapshot diffing ===");
    let (kernel, mut rt) = fixture::setup();
    rt.init();
    let frame = blank_frame(&rt);

    kernel.press(scancode::ENTER);
    rt.draw_frame(&frame);
    assert_eq!(drain(&mut rt), vec![KeyEvent::new(true, keys::KEY_ENTER)]);

    rt.draw_frame(&frame);
    rt.draw_frame(&frame);
    assert!(drain(&mut rt).is_empty());

    kernel.release(scancode::ENTER);
    rt.draw_frame(&frame);
    assert_eq!(drain(&mut rt), vec![KeyEvent::new(false, keys::KEY_ENTER)]);
    println!("✓ one edge per transition");
}

#[test]
fn test_frame_reaches_display_in_one_write() {
    let (kernel, mut rt) = fixture::setup();
    rt.init();
    let frame: Vec<u32> = (0..(rt.config.width * rt.config.height) as u32).collect();
    let writes = kernel.counters().write;

    rt.draw_frame(&frame);
    assert_eq!(kernel.counters().write, writes + 1);
    assert_eq!(kernel.frames(), 1);
    let shown = kernel.last_frame().unwrap();
    assert_eq!(shown.len(), rt.config.frame_bytes());
    assert_eq!(shown[4..8], 1u32.to_ne_bytes());
}

#[test]
fn test_mapping_and_unmapped_codes() {
    let mut bridge = InputBridge::new();
    let mut states = [0u8; KEY_STATES_LEN];

    states[scancode::A as usize] = 1;
    assert_eq!(bridge.apply_snapshot(&states), 0);
    assert_eq!(bridge.next_key(), None);

    states[scancode::LEFTCTRL as usize] = 1;
    states[scancode::RIGHTSHIFT as usize] = 1;
    states[scancode::N as usize] = 1;
    assert_eq!(bridge.apply_snapshot(&states), 3);
    // Events come out in scancode order: 29, 49, 54.
    assert_eq!(bridge.next_key(), Some(KeyEvent::new(true, keys::KEY_FIRE)));
    assert_eq!(bridge.next_key(), Some(KeyEvent::new(true, b'n')));
    assert_eq!(bridge.next_key(), Some(KeyEvent::new(true, keys::KEY_RSHIFT)));
    assert_eq!(bridge.next_key(), None);
}

#[test]
fn test_full_queue_keeps_newest_in_order() {
    println!("=== Testing dropping queue ===");
    let mut queue: KeyQueue<4> = KeyQueue::new();
    for key in 1..=6u8 {
        queue.push(KeyEvent::new(true, key));
    }
    assert_eq!(queue.len(), 4);
    let keys: Vec<u8> = std::iter::from_fn(|| queue.pop()).map(|e| e.key()).collect();
    assert_eq!(keys, vec![3, 4, 5, 6]);

    let mut bridge = InputBridge::new();
    let mut states = [0u8; KEY_STATES_LEN];
    for round in 0..40 {
        states[scancode::SPACE as usize] = (round % 2 == 0) as u8;
        bridge.apply_snapshot(&states);
    }
    assert_eq!(bridge.pending(), KEY_QUEUE_CAPACITY);
    // 40 edges, oldest 8 dropped: the 9th edge (index 8) is a press.
    assert_eq!(bridge.next_key(), Some(KeyEvent::new(true, keys::KEY_USE)));
    assert_eq!(bridge.next_key(), Some(KeyEvent::new(false, keys::KEY_USE)));
    println!("✓ queue holds the last {} edges", KEY_QUEUE_CAPACITY);
}

#[test]
fn test_short_snapshot_diffs_received_bytes_only() {
    let (kernel, mut rt) = fixture::setup();
    rt.init();
    kernel.set_snapshot_limit(Some(20));
    kernel.press(scancode::ESC);
    kernel.press(scancode::ENTER);

    assert_eq!(rt.input.poll(&mut rt.sys), 1);
    assert_eq!(rt.get_key(), Some(KeyEvent::new(true, keys::KEY_ESCAPE)));

    kernel.set_snapshot_limit(None);
    assert_eq!(rt.input.poll(&mut rt.sys), 1);
    assert_eq!(rt.get_key(), Some(KeyEvent::new(true, keys::KEY_ENTER)));
}

#[test]
fn test_missing_devices_are_no_ops() {
    let (kernel, mut rt) = fixture::setup();
    kernel.detach_devices();
    rt.init();
    assert!(!rt.input.has_input());
    assert!(!rt.input.has_display());

    kernel.press(scancode::ESC);
    let writes = kernel.counters().write;
    let frame = blank_frame(&rt);
    rt.draw_frame(&frame);
    assert_eq!(kernel.counters().write, writes);
    assert_eq!(kernel.frames(), 0);
    assert_eq!(rt.get_key(), None);
}

#[test]
fn test_key_held_at_startup_reports_press_on_first_poll() {
    let (kernel, mut rt) = fixture::setup();
    kernel.press(scancode::UP);
    rt.init();
    let frame = blank_frame(&rt);
    rt.draw_frame(&frame);
    assert_eq!(drain(&mut rt), vec![KeyEvent::new(true, keys::KEY_UPARROW)]);
}

#[test]
fn test_scheduled_keys_land_after_their_frame() {
    let (kernel, mut rt) = fixture::setup();
    kernel.schedule_key(2, scancode::F1 + 2, true);
    kernel.schedule_key(3, scancode::F1 + 2, false);
    rt.init();
    let frame = blank_frame(&rt);

    rt.draw_frame(&frame);
    assert!(drain(&mut rt).is_empty());
    rt.draw_frame(&frame);
    assert_eq!(drain(&mut rt), vec![KeyEvent::new(true, keys::KEY_F3)]);
    rt.draw_frame(&frame);
    assert_eq!(drain(&mut rt), vec![KeyEvent::new(false, keys::KEY_F3)]);
}

#[test]
fn test_window_title_is_ignored() {
    let (kernel, mut rt) = fixture::setup();
    rt.set_window_title("DOOM Shareware");
    assert_eq!(kernel.counters().total(), 0);
}
