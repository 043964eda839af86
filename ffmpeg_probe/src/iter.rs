use std::ffi::c_void;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr;

use crate::native::IterateFn;

/// Walks a native opaque-cursor iterator, yielding each record it reports.
///
/// The walk is lazy and cannot be restarted: once the native function returns
/// NULL it is never called again. Records borrow from the library for `'lib`.
pub struct DescriptorIter<'lib, R> {
    advance: IterateFn<R>,
    cursor: *mut c_void,
    done: bool,
    _library: PhantomData<&'lib R>,
}

impl<'lib, R> DescriptorIter<'lib, R> {
    /// Starts a walk with an empty cursor.
    ///
    /// # Safety
    /// `advance` must implement the cursor protocol described on [`IterateFn`] and
    /// every non-NULL record it returns must stay valid and unmodified for `'lib`.
    pub unsafe fn new(advance: IterateFn<R>) -> Self {
        Self {
            advance,
            cursor: ptr::null_mut(),
            done: false,
            _library: PhantomData,
        }
    }
}

impl<'lib, R: 'lib> Iterator for DescriptorIter<'lib, R> {
    type Item = &'lib R;

    fn next(&mut self) -> Option<&'lib R> {
        if self.done {
            return None;
        }

        // SAFETY: the cursor slot is owned by this iterator and `advance` follows
        // the protocol, as promised to `new`.
        let record = unsafe { (self.advance)(&mut self.cursor) };

        // SAFETY: non-NULL records stay valid for `'lib`, as promised to `new`.
        match unsafe { record.as_ref() } {
            Some(record) => Some(record),
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<'lib, R: 'lib> FusedIterator for DescriptorIter<'lib, R> {}
