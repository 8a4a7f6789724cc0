use super::*;

#[test]
fn push_assigns_increasing_ids_in_order() {
    let mut state = ToastState::default();
    let a = state.push(ToastKind::Success, "saved");
    let b = state.push(ToastKind::Error, "failed");
    assert!(a < b);
    let messages: Vec<&str> = state.toasts.iter().map(|t| t.message.as_str()).collect();
    assert_eq!(messages, ["saved", "failed"]);
}

#[test]
fn dismiss_removes_only_that_toast() {
    let mut state = ToastState::default();
    let a = state.push(ToastKind::Info, "one");
    let b = state.push(ToastKind::Info, "two");
    state.dismiss(a);
    assert_eq!(state.toasts.len(), 1);
    assert_eq!(state.toasts[0].id, b);

    state.dismiss(a);
    assert_eq!(state.toasts.len(), 1);
}

#[test]
fn ids_are_not_reused_after_dismiss() {
    let mut state = ToastState::default();
    let a = state.push(ToastKind::Info, "one");
    state.dismiss(a);
    let b = state.push(ToastKind::Info, "two");
    assert_ne!(a, b);
}

#[test]
fn kind_maps_to_css_modifier() {
    assert_eq!(ToastKind::Success.css_modifier(), "toast--success");
    assert_eq!(ToastKind::Error.css_modifier(), "toast--error");
    assert_eq!(ToastKind::Info.css_modifier(), "toast--info");
}
