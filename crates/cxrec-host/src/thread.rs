//! Thread identity resolution.

use crate::{members, HostRuntime, ReflectionCache, ThreadHandle};
use cxrec_types::{Result, ThreadId};

/// Resolve a thread handle to its stable numeric id.
///
/// Goes through the thread abstraction's id accessor reflectively. The
/// id is derived once per callback invocation and never cached: thread
/// handles are per-invocation and carry no stable identity beyond it.
pub fn resolve_thread_id(
    host: &dyn HostRuntime,
    cache: &ReflectionCache,
    thread: ThreadHandle,
) -> Result<ThreadId> {
    let accessor = cache.resolve(host, members::THREAD_GET_ID)?;
    let id = host.call_long(thread.as_object(), accessor.method)?;
    Ok(ThreadId::new(id))
}
