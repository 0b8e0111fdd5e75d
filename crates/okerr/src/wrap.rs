//! Adapting panicking functions and futures into [`Outcome`]-returning ones.
//!
//! Once a computation has passed through one of these wrappers, failures are
//! reported only as `Err` values; no panic from the wrapped code escapes.
//!
//! Rust has no variadic functions, so [`wrap_throwable`] and
//! [`wrap_async_throwable`] take the wrapped function's parameters as a
//! tuple: a `Fn(A, B) -> T` becomes a `Fn((A, B)) -> Outcome<T>`.

use crate::error::Error;
use crate::normalize::catch;
use crate::outcome::Outcome;

/// Runs `f` once, returning its value as `Ok` or its panic as `Err`.
///
/// The panic is caught after the process-wide panic hook has run, so the
/// default hook still prints it to stderr. Install a quiet hook with
/// [`std::panic::set_hook`] where that output is unwanted.
///
/// ```
/// use okerr::wrap;
///
/// assert_eq!(wrap(|| 6 * 7).unwrap(), 42);
///
/// let failed = wrap(|| -> i32 { panic!("no value") });
/// assert_eq!(failed.error().map(|e| e.message()), Some("no value"));
/// ```
pub fn wrap<T, F>(f: F) -> Outcome<T, Error>
where
    F: FnOnce() -> T,
{
    Outcome::from_result(catch("wrap", f))
}

/// A function callable with its parameters packed into a tuple.
///
/// Implemented for every `Fn` of up to eight parameters.
pub trait Throwable<Args> {
    /// The function's return type.
    type Output;

    /// Calls the function with unpacked arguments.
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_throwable {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Throwable<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_throwable!();
impl_throwable!(A1);
impl_throwable!(A1, A2);
impl_throwable!(A1, A2, A3);
impl_throwable!(A1, A2, A3, A4);
impl_throwable!(A1, A2, A3, A4, A5);
impl_throwable!(A1, A2, A3, A4, A5, A6);
impl_throwable!(A1, A2, A3, A4, A5, A6, A7);
impl_throwable!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Turns a function that may panic into one that returns an [`Outcome`].
///
/// ```
/// use okerr::wrap_throwable;
///
/// let divide = wrap_throwable(|a: i32, b: i32| a / b);
/// assert_eq!(divide((8, 2)).unwrap(), 4);
/// assert!(divide((8, 0)).is_error());
/// ```
pub fn wrap_throwable<Args, F>(f: F) -> impl Fn(Args) -> Outcome<F::Output, Error>
where
    F: Throwable<Args>,
{
    move |args: Args| Outcome::from_result(catch("wrap_throwable", || f.invoke(args)))
}

#[cfg(feature = "async")]
pub use self::future::{AsyncThrowable, Settle, wrap_async, wrap_async_throwable};

#[cfg(feature = "async")]
mod future {
    use std::future::Future;
    use std::panic::AssertUnwindSafe;
    use std::thread;

    use futures::FutureExt;
    use futures::future::{self, CatchUnwind, Either, Map, Ready};

    use super::Throwable;
    use crate::error::Error;
    use crate::normalize::{catch, normalize};
    use crate::outcome::Outcome;

    /// The future returned by [`wrap_async_throwable`]'s wrapper.
    ///
    /// Either an already-failed outcome (the function panicked before
    /// handing back a future) or the wrapped future with its panics caught.
    pub type Settle<Fut> = Either<
        Ready<Outcome<<Fut as Future>::Output, Error>>,
        Map<
            CatchUnwind<AssertUnwindSafe<Fut>>,
            fn(thread::Result<<Fut as Future>::Output>) -> Outcome<<Fut as Future>::Output, Error>,
        >,
    >;

    /// A function that returns a future, callable with its parameters packed
    /// into a tuple.
    ///
    /// Implemented for every [`Throwable`] whose output is a future.
    pub trait AsyncThrowable<Args> {
        /// What the future resolves to.
        type Output;
        /// The future the function returns.
        type Future: Future<Output = Self::Output>;

        /// Calls the function with unpacked arguments.
        fn invoke_async(&self, args: Args) -> Self::Future;
    }

    impl<F, Args> AsyncThrowable<Args> for F
    where
        F: Throwable<Args>,
        F::Output: Future,
    {
        type Output = <F::Output as Future>::Output;
        type Future = F::Output;

        fn invoke_async(&self, args: Args) -> Self::Future {
            self.invoke(args)
        }
    }

    /// Calls `f` and awaits the future it returns.
    ///
    /// A panic while creating the future or while polling it resolves to
    /// `Err`; the returned future itself never panics from the wrapped code.
    /// `f` runs on first poll, and no suspension points are added beyond the
    /// wrapped future's own.
    pub async fn wrap_async<F, Fut>(f: F) -> Outcome<Fut::Output, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        settle(catch("wrap_async", f)).await
    }

    /// Turns an async function that may panic into one whose future resolves
    /// to an [`Outcome`].
    ///
    /// The function is called synchronously when the wrapper is called; a
    /// panic at that point is reported when the returned future is awaited.
    ///
    /// ```
    /// use okerr::wrap_async_throwable;
    ///
    /// # futures::executor::block_on(async {
    /// let scaled = wrap_async_throwable(|n: u32, factor: u32| async move { n * factor });
    /// assert_eq!(scaled((6, 7)).await.unwrap(), 42);
    /// # });
    /// ```
    pub fn wrap_async_throwable<Args, F>(f: F) -> impl Fn(Args) -> Settle<F::Future>
    where
        F: AsyncThrowable<Args>,
    {
        move |args: Args| settle(catch("wrap_async_throwable", || f.invoke_async(args)))
    }

    fn settle<Fut: Future>(started: Result<Fut, Error>) -> Settle<Fut> {
        match started {
            Ok(started) => {
                let finish: fn(thread::Result<Fut::Output>) -> Outcome<Fut::Output, Error> =
                    finish_polled;
                Either::Right(AssertUnwindSafe(started).catch_unwind().map(finish))
            }
            Err(error) => Either::Left(future::ready(Outcome::Err(error))),
        }
    }

    fn finish_polled<T>(polled: thread::Result<T>) -> Outcome<T, Error> {
        match polled {
            Ok(value) => Outcome::Ok(value),
            Err(payload) => {
                let error = normalize(payload);
                tracing::debug!(error = %error, "caught panic while polling");
                Outcome::Err(error)
            }
        }
    }
}
