use std::{
  any::Any,
  panic::{catch_unwind, AssertUnwindSafe},
};

/// Run `f`, logging and swallowing a panic instead of unwinding into the
/// caller. Used where one consumer's failure must not starve its siblings.
pub(crate) fn isolate(context: &'static str, f: impl FnOnce()) {
  if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
    tracing::error!(context, panic = panic_message(payload.as_ref()), "callback panicked");
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "<non-string panic payload>"
  }
}
