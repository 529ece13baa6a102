//! Cookies: [`Cookie`], [`CookieJar`], [`CookieStore`] and backends.

mod cookie;
mod cookie_jar;
mod persistent_cookie_jar;
mod store;

pub use cookie::cookie_value;
pub use cookie::Cookie;
pub use cookie::CookieJarHandle;
pub use cookie::SameSite;

pub use cookie_jar::CookieJar;
pub use cookie_jar::DefaultCookieJar;
pub use cookie_jar::NullCookieJar;
pub use persistent_cookie_jar::PersistentCookieJar;

pub use store::CookieStore;
pub use store::CookieStoreHandle;
pub use store::JsonCookieStore;
pub use store::WeakCookieStoreHandle;
