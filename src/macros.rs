// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // String-type concatenation shorthand!
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

/// Build a `FormSubmission` in the exact field order given.
///
/// ```text
/// form_body! { "destdisp" => id, "ipaddr" => &q.ip_address }
/// ```
#[macro_export]
macro_rules! form_body {
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut f = $crate::specs::form::FormSubmission::new();
        $(
            f.push($name, $value);
        )+
        f
    }};
}
