//! The writer: reproduces source text from a tree.
//!
//! This is the exact structural inverse of the parser and its only contract is
//! `write(parse(text)) == text` for any parser-produced tree. It walks each node's
//! structure slots and payload in grammar order and never normalises anything.

use crate::ast::{
    Array, ArrayItem, Content, Identifier, Literal, LiteralValue, Object, Property, RootNode,
    Structure, Value,
};

/// Render a complete document tree back into text
pub fn write(root: &RootNode) -> String {
    let mut writer = Writer::default();
    writer.append_value(&root.value);
    writer.out
}

#[derive(Default)]
struct Writer {
    out: String,
}

impl Writer {
    fn append_structure(&mut self, structure: &Structure) {
        for item in structure {
            self.out.push_str(&item.text);
        }
    }

    fn append_value(&mut self, value: &Value) {
        self.append_structure(&value.prefix);
        self.append_content(&value.content);
        self.append_structure(&value.suffix);
    }

    fn append_content(&mut self, content: &Content) {
        match content {
            Content::Object(object) => self.append_object(object),
            Content::Array(array) => self.append_array(array),
            Content::Literal(literal) => self.append_literal(literal),
        }
    }

    fn append_object(&mut self, object: &Object) {
        self.out.push('{');
        for child in &object.children {
            self.append_property(child);
        }
        self.append_structure(&object.suffix);
        self.out.push('}');
    }

    fn append_property(&mut self, property: &Property) {
        self.append_identifier(&property.key);
        self.out.push(':');
        self.append_value(&property.value);
        if property.has_comma_separator {
            self.out.push(',');
        }
    }

    fn append_identifier(&mut self, identifier: &Identifier) {
        self.append_structure(&identifier.prefix);
        self.out.push(identifier.delimiter);
        self.out.push_str(&identifier.name);
        self.out.push(identifier.delimiter);
        self.append_structure(&identifier.suffix);
    }

    fn append_array(&mut self, array: &Array) {
        self.out.push('[');
        for child in &array.children {
            self.append_array_item(child);
        }
        self.append_structure(&array.suffix);
        self.out.push(']');
    }

    fn append_array_item(&mut self, item: &ArrayItem) {
        self.append_structure(&item.prefix);
        self.append_content(&item.value);
        self.append_structure(&item.suffix);
        if item.has_comma_separator {
            self.out.push(',');
        }
    }

    fn append_literal(&mut self, literal: &Literal) {
        // numbers retain their source spelling, which the default formatting of a
        // resolved float cannot be trusted to reproduce
        if let Some(original) = &literal.original_rendering {
            self.out.push_str(original);
            return;
        }
        match &literal.value {
            LiteralValue::String(value) => {
                let delimiter = literal.delimiter.unwrap_or('"');
                self.out.push(delimiter);
                self.out.push_str(value);
                self.out.push(delimiter);
            }
            LiteralValue::Boolean(value) => {
                self.out.push_str(if *value { "true" } else { "false" });
            }
            LiteralValue::Null => self.out.push_str("null"),
            LiteralValue::Integer(value) => self.out.push_str(&value.to_string()),
            LiteralValue::Float(value) => self.out.push_str(&value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::write;
    use crate::parser::Parser;

    fn assert_round_trips(input: &str) {
        let root = Parser::new(input).parse().unwrap();
        assert_eq!(write(&root), input, "failed to round-trip: {input}");
    }

    #[test]
    fn should_round_trip_simple_documents() {
        assert_round_trips(r#"{"a": 1}"#);
        assert_round_trips(r#"{"a":1,"b":[true,false,null]}"#);
        assert_round_trips("[1, 2, 3]");
    }

    #[test]
    fn should_round_trip_empty_containers() {
        assert_round_trips("{}");
        assert_round_trips("[]");
        assert_round_trips("{   }");
        assert_round_trips("[ /* empty */ ]");
    }

    #[test]
    fn should_round_trip_whitespace_layouts() {
        assert_round_trips("{\n\t\"a\" : 1 ,\n\t\"b\" : 2\n\n}");
        assert_round_trips("  [ 1 ,\t2 ,\r\n3 ]  ");
        assert_round_trips("\n{\"a\":{\"b\":{\"c\":[]}}}\n");
    }

    #[test]
    fn should_round_trip_comments() {
        assert_round_trips("// leading\n{\"a\": 1}");
        assert_round_trips("{\n  // per property\n  \"a\": 1\n}");
        assert_round_trips("{\"a\": /* inline */ 1}");
        assert_round_trips("[1, /* between */ 2] // trailing");
    }

    #[test]
    fn should_round_trip_quote_styles() {
        assert_round_trips(r#"{'single': 'quoted'}"#);
        assert_round_trips(r#"{"mixed": 'values', 'and': "keys"}"#);
    }

    #[test]
    fn should_round_trip_trailing_commas() {
        assert_round_trips("{\"a\": 1,}");
        assert_round_trips("{\"a\": 1, \"b\": 2 , }");
        assert_round_trips("[1, 2, 3, ]");
    }

    #[test]
    fn should_round_trip_numeric_spellings() {
        assert_round_trips("[1.50, -0.25, 10.0, 42]");
        assert_round_trips(r#"{"pi": 3.14159, "zero": 0.000}"#);
    }

    #[test]
    fn should_round_trip_escaped_strings() {
        assert_round_trips(r#"{"a": "say \"hi\""}"#);
        assert_round_trips(r#"{"path": "a\\b"}"#);
    }

    #[test]
    fn should_round_trip_a_structure_heavy_document() {
        assert_round_trips(concat!(
            "// header comment\n",
            "{\n",
            "  /* section one */\n",
            "  'first' : [ 1 , 2.50 , { \"deep\" : null } , ] ,\n",
            "  \"second\"\t:\t\"text\", // explains second\n",
            "  \"third\": { }\n",
            "}\n",
            "/* footer */\n",
        ));
    }
}
