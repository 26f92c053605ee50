#![no_main]

use arbitrary::Arbitrary;
use configurer::directive::Directive;
use configurer::policy::FieldPolicy;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Input<'a> {
    /// Raw directive text.
    Raw(&'a str),

    /// Label/value pairs to escape, join and parse back.
    Pairs(Vec<(&'a str, &'a str)>),
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for chr in text.chars() {
        if matches!(chr, '\\' | '=' | ',') {
            out.push('\\');
        }
        out.push(chr);
    }
    out
}

fuzz_target!(|input: Input<'_>| {
    match input {
        Input::Raw(text) => {
            // Errors are fine, panics are not.
            let _ = FieldPolicy::parse(text);

            if let Ok(directive) = Directive::parse(text) {
                let again = Directive::parse(&directive.to_string())
                    .expect("display output must parse");
                assert_eq!(again, directive);
            }
        }

        Input::Pairs(pairs) => {
            let pairs: Vec<_> = pairs
                .into_iter()
                .filter(|(label, _)| !label.is_empty())
                .collect();

            let text = pairs
                .iter()
                .map(|(label, value)| {
                    if value.is_empty() {
                        escape(label)
                    } else {
                        format!("{}={}", escape(label), escape(value))
                    }
                })
                .collect::<Vec<_>>()
                .join(",");

            let directive = Directive::parse(&text).expect("escaped pairs must parse");
            assert_eq!(directive.pairs().len(), pairs.len());

            for ((label, value), (parsed_label, parsed_value)) in
                pairs.iter().zip(directive.pairs())
            {
                assert_eq!(label, parsed_label);
                assert_eq!(value, parsed_value);
            }
        }
    }
});
