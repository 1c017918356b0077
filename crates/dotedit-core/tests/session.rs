//! End-to-end behavior of an editing session.

use dotedit_core::{
    Address, Clipboard, Command, EditorEvent, Key, KeyPress, MemoryClipboard, Modifiers, Selection,
    Session,
};

fn loaded(text: &str) -> Session {
    let mut session = Session::new();
    session.load(text.as_bytes());
    session
}

fn type_str(session: &mut Session, s: &str) {
    for c in s.chars() {
        session.execute(Command::Insert(c));
    }
}

fn sel(r1: usize, c1: usize, r2: usize, c2: usize) -> Selection {
    Selection::new(Address::new(r1, c1), Address::new(r2, c2))
}

#[test]
fn load_round_trips_contents() {
    for text in ["", "plain", "two\nlines", "trailing\n", "ünïcödé\n日本語\n\n"] {
        let session = loaded(text);
        assert_eq!(session.contents(), text);
    }
}

#[test]
fn insert_then_delete_restores_contents() {
    let mut session = loaded("alpha\nbeta");
    let span = session.insert_at(Address::new(1, 2), "XX\nYY");
    assert_eq!(session.contents(), "alpha\nbeXX\nYYta");
    assert_eq!(session.delete_selection(span), Address::new(1, 2));
    assert_eq!(session.contents(), "alpha\nbeta");
}

#[test]
fn out_of_range_addresses_clamp() {
    let mut session = loaded("ab\ncd");
    session.insert_at(Address::new(9, 9), "!");
    assert_eq!(session.contents(), "ab\ncd!");
    session.insert_at(Address::new(0, 50), "?");
    assert_eq!(session.contents(), "ab?\ncd!");
}

#[test]
fn undo_and_redo_at_boundaries_are_noops() {
    let mut session = loaded("unchanged");
    assert!(!session.undo());
    assert!(!session.redo());
    assert_eq!(session.contents(), "unchanged");

    type_str(&mut session, "x");
    assert!(!session.redo());
    assert!(session.undo());
    assert!(!session.undo());
    assert_eq!(session.contents(), "unchanged");
}

#[test]
fn undo_n_then_redo_n_restores_contents_and_dot() {
    let mut session = loaded("one two three");
    session.insert_at(Address::new(0, 3), ",");
    session.delete_selection(sel(0, 5, 0, 8));
    type_str(&mut session, "2");
    session.execute(Command::Newline);
    session.insert_at(Address::ZERO, "zero ");

    let contents = session.contents();
    let dot = session.dot();

    let mut undone = 0;
    while session.undo() {
        undone += 1;
    }
    assert_eq!(undone, 4);
    assert_eq!(session.contents(), "one two three");

    for _ in 0..undone {
        assert!(session.redo());
    }
    assert_eq!(session.contents(), contents);
    assert_eq!(session.dot(), dot);
}

#[test]
fn typing_coalesces_into_one_undo_step() {
    let mut session = loaded("");
    type_str(&mut session, "abc");
    assert_eq!(session.contents(), "abc");

    assert!(session.undo());
    assert_eq!(session.contents(), "");
    assert!(!session.undo());
}

#[test]
fn arrow_key_splits_undo_steps() {
    let mut session = loaded("");
    type_str(&mut session, "abc");
    session.execute(Command::MoveLeft);
    session.execute(Command::MoveRight);
    type_str(&mut session, "def");
    assert_eq!(session.contents(), "abcdef");

    assert!(session.undo());
    assert_eq!(session.contents(), "abc");
}

#[test]
fn backspaces_coalesce_with_typing() {
    let mut session = loaded("hello");
    session.set_selection(Selection::caret(Address::new(0, 5)));
    type_str(&mut session, "xy");
    session.execute(Command::Backspace);
    session.execute(Command::Backspace);
    session.execute(Command::Backspace);
    assert_eq!(session.contents(), "hell");

    assert!(session.undo());
    assert_eq!(session.contents(), "hello");
    assert!(!session.can_undo());
}

#[test]
fn forward_delete_coalesces() {
    let mut session = loaded("abcdef");
    session.set_selection(Selection::caret(Address::new(0, 1)));
    session.execute(Command::Delete);
    session.execute(Command::Delete);
    assert_eq!(session.contents(), "adef");

    session.undo();
    assert_eq!(session.contents(), "abcdef");
    assert_eq!(session.dot_text(), "bc");
}

#[test]
fn commit_after_undo_discards_redo_branch() {
    let mut session = loaded("");
    type_str(&mut session, "first");
    session.execute(Command::Newline);
    type_str(&mut session, "second");

    session.undo();
    type_str(&mut session, "other");
    assert!(!session.redo());
    assert_eq!(session.contents(), "first\nother");
}

#[test]
fn find_next_wraps_around() {
    let mut session = loaded("foo bar foo");
    session.set_selection(sel(0, 8, 0, 11));
    assert!(session.find_next("foo"));
    assert_eq!(session.dot(), sel(0, 0, 0, 3));
}

#[test]
fn find_next_advances_from_selected_match() {
    let mut session = loaded("foo bar foo");
    assert!(session.find_next("foo"));
    assert_eq!(session.dot(), sel(0, 0, 0, 3));
    assert!(session.find_next("foo"));
    assert_eq!(session.dot(), sel(0, 8, 0, 11));
}

#[test]
fn failed_search_leaves_dot() {
    let mut session = loaded("foo bar foo");
    session.set_selection(sel(0, 4, 0, 7));
    assert!(!session.find_next("baz"));
    assert!(!session.jump_to("/baz/"));
    assert_eq!(session.dot(), sel(0, 4, 0, 7));
}

#[test]
fn jump_to_regex_and_lines() {
    let mut session = loaded("fn main() {\n    let x = 42;\n}\n");
    assert!(session.jump_to("/[0-9]+/"));
    assert_eq!(session.dot_text(), "42");

    assert!(session.jump_to("2"));
    assert_eq!(session.dot_text(), "    let x = 42;\n");

    assert!(session.jump_to("?fn?"));
    assert_eq!(session.dot(), sel(0, 0, 0, 2));

    assert!(session.jump_to("$"));
    assert_eq!(session.dot(), Selection::caret(session.last_address()));
}

#[test]
fn search_wrap_does_not_cross_dot() {
    let mut session = loaded("abcd");
    session.set_selection(Selection::caret(Address::new(0, 2)));
    assert!(!session.find_next("bc"));
    assert!(!session.jump_to("/bc/"));
    assert!(!session.jump_to("?bc?"));
    assert_eq!(session.dot(), Selection::caret(Address::new(0, 2)));
}

#[test]
fn jump_to_anchors_ignore_dot_position() {
    let mut session = loaded("xfoo\nfoo bar");
    session.set_selection(Selection::caret(Address::new(0, 1)));
    assert!(session.jump_to("/^foo/"));
    assert_eq!(session.dot(), sel(1, 0, 1, 3));

    session.set_selection(Selection::caret(Address::new(0, 1)));
    assert!(session.jump_to(r"/\bfoo\b/"));
    assert_eq!(session.dot(), sel(1, 0, 1, 3));

    session.set_selection(Selection::caret(Address::new(1, 5)));
    assert!(session.jump_to("?foo$?"));
    assert_eq!(session.dot(), sel(0, 1, 0, 4));
}

#[test]
fn auto_select_picks_outer_bracket() {
    let session = loaded("a(b(c)d)e");
    let found = session.auto_select(Address::new(0, 2));
    assert_eq!(session.selection_text(found), "b(c)d");
}

#[test]
fn double_click_sets_dot() {
    let mut session = loaded("let value = 1;");
    assert!(session.execute(Command::DoubleClick(Address::new(0, 6))));
    assert_eq!(session.dot_text(), "value");
}

#[test]
fn saved_tracking() {
    let mut session = loaded("text");
    session.mark_saved();
    assert!(!session.is_modified_since_save());

    session.execute(Command::Insert('!'));
    assert!(session.is_modified_since_save());

    session.undo();
    assert!(!session.is_modified_since_save());

    session.redo();
    assert!(session.is_modified_since_save());
    session.mark_saved();
    assert!(!session.is_modified_since_save());
}

#[test]
fn typing_then_erasing_is_unmodified() {
    let mut session = loaded("text");
    type_str(&mut session, "ab");
    session.execute(Command::Backspace);
    session.execute(Command::Backspace);
    assert!(!session.is_modified_since_save());
}

#[test]
fn save_point_lost_when_branch_discarded() {
    let mut session = loaded("");
    type_str(&mut session, "a");
    session.mark_saved();
    session.undo();
    type_str(&mut session, "b");
    session.undo();
    assert_eq!(session.contents(), "");
    assert!(session.is_modified_since_save());
}

#[test]
fn cut_and_paste_through_clipboard() {
    let clipboard = MemoryClipboard::new();
    let mut session = Session::new().with_clipboard(clipboard.clone());
    session.load(b"move this word");

    session.set_selection(sel(0, 5, 0, 10));
    assert!(session.execute(Command::Cut));
    assert_eq!(session.contents(), "move word");
    assert_eq!(clipboard.get().unwrap(), "this ");

    session.set_selection(Selection::caret(session.last_address()));
    assert!(session.execute(Command::Paste));
    assert_eq!(session.contents(), "move wordthis ");

    session.undo();
    session.undo();
    assert_eq!(session.contents(), "move this word");
}

#[test]
fn clipboard_absence_is_not_fatal() {
    let mut session = loaded("abc");
    session.execute(Command::SelectAll);
    assert!(!session.execute(Command::Copy));
    assert!(!session.execute(Command::Cut));
    assert!(!session.execute(Command::Paste));
    assert_eq!(session.contents(), "abc");
}

#[test]
fn key_presses_drive_the_session() {
    let mut session = loaded("");
    for c in "hi".chars() {
        session.handle_key(KeyPress::plain(Key::Char(c)));
    }
    session.handle_key(KeyPress::plain(Key::Enter));
    assert_eq!(session.contents(), "hi\n");

    // "hi" and the line break it ends are one undo step
    session.handle_key(KeyPress::new(Key::Char('z'), Modifiers::CTRL));
    assert_eq!(session.contents(), "");
    session.handle_key(KeyPress::new(Key::Char('y'), Modifiers::CTRL));
    assert_eq!(session.contents(), "hi\n");

    assert!(!session.handle_key(KeyPress::new(Key::Char('q'), Modifiers::CTRL)));
}

#[test]
fn load_file_resets_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");
    std::fs::write(&path, "from disk").unwrap();

    let mut session = loaded("");
    type_str(&mut session, "scratch");
    session.load_file(&path).unwrap();
    assert_eq!(session.contents(), "from disk");
    assert!(!session.can_undo());
    assert!(!session.is_modified_since_save());

    session.insert_at(Address::ZERO, "edited ");
    let out = dir.path().join("output.txt");
    session.save_to(&out).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "edited from disk");
    assert!(!session.is_modified_since_save());
}

#[tokio::test]
async fn events_are_broadcast() {
    let mut session = loaded("");
    let mut rx = session.subscribe();

    session.execute(Command::Insert('a'));
    session.commit();

    assert_eq!(rx.recv().await.unwrap(), EditorEvent::TextChanged);
    assert_eq!(
        rx.recv().await.unwrap(),
        EditorEvent::SelectionChanged(Selection::caret(Address::new(0, 1)))
    );
    assert_eq!(rx.recv().await.unwrap(), EditorEvent::Committed);
}

#[test]
fn redo_restores_dot_from_before_undo() {
    let mut session = loaded("hello");
    session.set_selection(Selection::caret(Address::new(0, 5)));
    type_str(&mut session, "abc");
    session.commit();
    session.set_selection(sel(0, 0, 0, 5));

    assert!(session.undo());
    assert_eq!(session.contents(), "hello");
    assert!(session.redo());
    assert_eq!(session.contents(), "helloabc");
    assert_eq!(session.dot(), sel(0, 0, 0, 5));
}

#[test]
fn non_typing_commands_commit_even_when_they_fail() {
    let mut session = loaded("");
    type_str(&mut session, "ab");
    assert!(!session.execute(Command::FindNext("zz".into())));
    type_str(&mut session, "c");

    assert!(session.undo());
    assert_eq!(session.contents(), "ab");
}
