use serde_json::{Map, Value};

/// Per-node message overrides. A code-specific override beats the catch-all.
#[derive(Debug, Clone, Default)]
pub(crate) struct Messages {
    all: Option<String>,
    by_code: Vec<(String, String)>,
}

impl Messages {
    pub(crate) fn set_all(&mut self, text: String) {
        self.all = Some(text);
    }

    pub(crate) fn set(&mut self, code: String, text: String) {
        self.by_code.retain(|(existing, _)| *existing != code);
        self.by_code.push((code, text));
    }

    pub(crate) fn specific(&self, code: &str) -> Option<&str> {
        self.by_code
            .iter()
            .find(|(existing, _)| existing == code)
            .map(|(_, text)| text.as_str())
    }

    pub(crate) fn template(&self, code: &str) -> Option<&str> {
        self.specific(code).or(self.all.as_deref())
    }
}

pub(crate) fn default_template(code: &str) -> &'static str {
    match code {
        "any.required" => "\"{#label}\" is required",
        "any.only" => "\"{#label}\" must be one of {#valids}",
        "any.unknown" | "object.unknown" => "\"{#label}\" is not allowed",
        "object.base" => "\"{#label}\" must be of type object",
        "array.base" => "\"{#label}\" must be an array",
        "array.min" => "\"{#label}\" must contain at least {#limit} items",
        "array.max" => "\"{#label}\" must contain less than or equal to {#limit} items",
        "array.unique" => "\"{#label}\" contains a duplicate value",
        "string.base" => "\"{#label}\" must be a string",
        "string.empty" => "\"{#label}\" is not allowed to be empty",
        "string.min" => "\"{#label}\" length must be at least {#limit} characters long",
        "string.max" => {
            "\"{#label}\" length must be less than or equal to {#limit} characters long"
        }
        "string.pattern.base" => "\"{#label}\" with value \"{#value}\" fails to match the {#name} pattern",
        "number.base" => "\"{#label}\" must be a number",
        "number.integer" => "\"{#label}\" must be an integer",
        "number.min" => "\"{#label}\" must be greater than or equal to {#limit}",
        "number.max" => "\"{#label}\" must be less than or equal to {#limit}",
        "number.digits" => "\"{#label}\" must have no more than {#limit} digits",
        "boolean.base" => "\"{#label}\" must be a boolean",
        _ => "\"{#label}\" is invalid",
    }
}

/// Replaces `{#name}` placeholders with values from the error context.
/// Unknown names render as nothing.
pub(crate) fn render(template: &str, context: &Map<String, Value>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{#") {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                if let Some(value) = context.get(&after[..end]) {
                    rendered.push_str(&display_value(value));
                }
                rest = &after[end + 1..];
            }
            None => {
                rendered.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", inner.join(", "))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn render_interpolates_known_placeholders() {
        let ctx = context(json!({ "label": "witnesses", "limit": 1, "valids": ["YES", "NO"] }));
        assert_eq!(
            render("\"{#label}\" needs {#limit} of {#valids}", &ctx),
            "\"witnesses\" needs 1 of [YES, NO]"
        );
    }

    #[test]
    fn render_drops_unknown_and_keeps_unterminated_text() {
        let ctx = context(json!({ "label": "x" }));
        assert_eq!(render("a{#missing}b {#label", &ctx), "ab {#label");
    }

    #[test]
    fn specific_message_beats_catch_all() {
        let mut messages = Messages::default();
        messages.set_all("Enter a value".to_string());
        messages.set("array.unique".to_string(), "Duplicate".to_string());

        assert_eq!(messages.template("array.unique"), Some("Duplicate"));
        assert_eq!(messages.template("any.required"), Some("Enter a value"));
        assert_eq!(messages.specific("any.required"), None);
    }
}
