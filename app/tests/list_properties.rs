//! Property tests for list updates.

use proptest::prelude::*;
use todoboard::widgets::InputWidget;
use todoboard::{Todo, TodoAction, TodoList, TodoReducer, UserId, all_done};

fn todo() -> impl Strategy<Value = Todo> {
    ("[a-z ]{1,12}", proptest::option::of(0u64..20), any::<bool>()).prop_map(
        |(title, user, is_done)| Todo {
            title,
            user: user.map(UserId::new),
            is_done,
        },
    )
}

fn todo_list() -> impl Strategy<Value = TodoList> {
    proptest::collection::vec(todo(), 0..12).prop_map(TodoList::from)
}

proptest! {
    #[test]
    fn toggle_changes_only_target(list in todo_list(), seed in any::<usize>()) {
        prop_assume!(!list.is_empty());
        let index = seed % list.len();

        let next = list.toggle_at(index);

        prop_assert_eq!(next.len(), list.len());
        for (position, (before, after)) in list.iter().zip(next.iter()).enumerate() {
            if position == index {
                prop_assert_eq!(&before.title, &after.title);
                prop_assert_eq!(before.user, after.user);
                prop_assert_eq!(before.is_done, !after.is_done);
            } else {
                prop_assert_eq!(before, after);
            }
        }
        prop_assert!(!next.ptr_eq(&list));
    }

    #[test]
    fn out_of_range_updates_leave_list_equal(list in todo_list(), offset in 0usize..5, user in 0u64..10) {
        let index = list.len() + offset;

        prop_assert_eq!(&list.toggle_at(index), &list);
        prop_assert_eq!(&list.assign_at(index, UserId::new(user)), &list);
        prop_assert_eq!(&list.remove_at(index), &list);
    }

    #[test]
    fn remove_twice_never_panics(list in todo_list(), seed in any::<usize>()) {
        prop_assume!(!list.is_empty());
        let index = seed % list.len();

        let once = TodoReducer::next(&list, TodoAction::Remove { index });
        let twice = TodoReducer::next(&once, TodoAction::Remove { index });

        prop_assert_eq!(once.len(), list.len() - 1);
        prop_assert!(twice.len() == once.len() || twice.len() == once.len() - 1);
    }

    #[test]
    fn replace_all_is_idempotent(list in todo_list()) {
        let once = list.replace_all(&list);
        let twice = once.replace_all(&once);

        prop_assert_eq!(&once, &list);
        prop_assert_eq!(&twice, &once);
        prop_assert!(!once.ptr_eq(&list));
    }

    #[test]
    fn updates_never_touch_previous_snapshot(list in todo_list(), seed in any::<usize>()) {
        let before: Vec<Todo> = list.iter().cloned().collect();
        let index = if list.is_empty() { 0 } else { seed % list.len() };

        let _ = list.add(Todo::new("extra"));
        let _ = list.toggle_at(index);
        let _ = list.assign_at(index, UserId::new(1));
        let _ = list.remove_at(index);
        let _ = list.toggled_all();

        prop_assert_eq!(list.as_slice(), before.as_slice());
    }

    #[test]
    fn all_done_is_order_independent(list in todo_list()) {
        let reversed: Vec<Todo> = list.iter().rev().cloned().collect();

        prop_assert_eq!(all_done(list.as_slice()), all_done(&reversed));
        prop_assert_eq!(list.all_done(), !list.is_empty() && list.iter().all(|t| t.is_done));
    }

    #[test]
    fn blank_drafts_never_emit(draft in "[ \t]{0,8}") {
        let mut input = InputWidget::new();
        input.on_change_draft(draft.clone());

        prop_assert_eq!(input.on_confirm(), None);
        prop_assert_eq!(input.draft(), draft.as_str());
    }
}

#[test]
fn all_done_cases() {
    let done = Todo::new("a").with_done(true);
    let open = Todo::new("b");

    assert!(!all_done(&[]));
    assert!(all_done(std::slice::from_ref(&done)));
    assert!(!all_done(&[open.clone(), done.clone()]));
    assert!(!all_done(&[done, open]));
}

#[test]
fn confirm_path_stores_trimmed_title() {
    let mut input = InputWidget::new();
    input.on_change_draft("  Buy milk  ");

    let Some(action) = input.on_confirm() else {
        unreachable!("non-blank draft must emit");
    };
    let list = TodoReducer::next(&TodoList::new(), action);

    assert_eq!(list.get(0).map(|todo| todo.title.as_str()), Some("Buy milk"));
}
