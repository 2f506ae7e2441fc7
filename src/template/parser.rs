//! Template parser.
//!
//! Turns template text into a tree of [`Node`]s.

use super::{Result, TemplateError};

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text.
    Text(String),

    /// Escaped variable: `{{name}}` or `{{post.title}}`
    Variable(String),

    /// Unescaped variable: `{{{content}}}`
    Raw(String),

    /// Conditional block: `{{#if condition}}...{{else}}...{{/if}}`
    If {
        condition: String,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },

    /// Loop block: `{{#each items}}...{{/each}}`
    Each {
        variable: String,
        item_name: Option<String>,
        body: Vec<Node>,
    },

    /// Unless block (inverse of if): `{{#unless condition}}...{{/unless}}`
    Unless { condition: String, body: Vec<Node> },

    /// With block (scope change): `{{#with object}}...{{/with}}`
    With { variable: String, body: Vec<Node> },
}

/// Template parser.
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the template into a list of nodes.
    pub fn parse(mut self) -> Result<Vec<Node>> {
        let nodes = self.parse_nodes(None)?;
        if self.pos < self.input.len() {
            let found: String = self.input[self.pos..].chars().take(12).collect();
            return Err(TemplateError::Parse(format!(
                "Unexpected closing tag '{found}'"
            )));
        }
        Ok(nodes)
    }

    /// Parse nodes until reaching a closing tag or end of input.
    fn parse_nodes(&mut self, end_tag: Option<&str>) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();

        while self.pos < self.input.len() {
            if self.peek_str("{{/") {
                break;
            }
            if self.peek_str("{{else}}") {
                if end_tag == Some("if") {
                    break;
                }
                return Err(TemplateError::Parse("'else' outside of if".to_string()));
            }

            if self.peek_str("\\{{") {
                self.pos += 3;
                nodes.push(Node::Text("{{".to_string()));
            } else if self.peek_str("{{{") {
                nodes.push(self.parse_raw()?);
            } else if self.peek_str("{{!") {
                self.skip_comment()?;
            } else if self.peek_str("{{") {
                nodes.push(self.parse_tag()?);
            } else {
                let text = self.collect_text();
                if !text.is_empty() {
                    nodes.push(Node::Text(text));
                }
            }
        }

        Ok(nodes)
    }

    /// Parse `{{{name}}}`.
    fn parse_raw(&mut self) -> Result<Node> {
        self.expect("{{{")?;
        self.skip_whitespace();
        let name = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}}")?;
        Ok(Node::Raw(name))
    }

    /// Skip `{{! ... }}`.
    fn skip_comment(&mut self) -> Result<()> {
        match self.input[self.pos..].find("}}") {
            Some(end) => {
                self.pos += end + 2;
                Ok(())
            }
            None => Err(TemplateError::Parse("Unterminated comment".to_string())),
        }
    }

    /// Parse a single tag.
    fn parse_tag(&mut self) -> Result<Node> {
        self.expect("{{")?;
        self.skip_whitespace();

        if self.peek_char() == Some('#') {
            self.advance();
            self.skip_whitespace();
            return self.parse_block_tag();
        }

        let name = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}")?;

        Ok(Node::Variable(name))
    }

    /// Parse a block tag (if, each, unless, with).
    fn parse_block_tag(&mut self) -> Result<Node> {
        let tag_name = self.parse_identifier()?;
        self.skip_whitespace();

        match tag_name.as_str() {
            "if" => self.parse_if_block(),
            "each" => self.parse_each_block(),
            "unless" => self.parse_unless_block(),
            "with" => self.parse_with_block(),
            _ => Err(TemplateError::Parse(format!(
                "Unknown block tag: {tag_name}"
            ))),
        }
    }

    /// Parse an if block.
    fn parse_if_block(&mut self) -> Result<Node> {
        let condition = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}")?;

        let then_branch = self.parse_nodes(Some("if"))?;

        let else_branch = if self.peek_str("{{else}}") {
            self.expect("{{else}}")?;
            self.parse_nodes(Some("if-else"))?
        } else {
            Vec::new()
        };

        self.expect("{{/if}}")?;

        Ok(Node::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// Parse an each block.
    fn parse_each_block(&mut self) -> Result<Node> {
        let variable = self.parse_identifier()?;
        self.skip_whitespace();

        let item_name = if self.peek_str("as ") {
            self.expect("as ")?;
            self.skip_whitespace();
            Some(self.parse_identifier()?)
        } else {
            None
        };

        self.skip_whitespace();
        self.expect("}}")?;

        let body = self.parse_nodes(Some("each"))?;
        self.expect("{{/each}}")?;

        Ok(Node::Each {
            variable,
            item_name,
            body,
        })
    }

    /// Parse an unless block.
    fn parse_unless_block(&mut self) -> Result<Node> {
        let condition = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}")?;

        let body = self.parse_nodes(Some("unless"))?;
        self.expect("{{/unless}}")?;

        Ok(Node::Unless { condition, body })
    }

    /// Parse a with block.
    fn parse_with_block(&mut self) -> Result<Node> {
        let variable = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}")?;

        let body = self.parse_nodes(Some("with"))?;
        self.expect("{{/with}}")?;

        Ok(Node::With { variable, body })
    }

    /// Parse an identifier: letters, digits, `_`, `-`, `.` and a leading `@`.
    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.pos;

        if self.peek_char() == Some('@') {
            self.advance();
        }
        while self.pos < self.input.len() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == '-' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(TemplateError::Parse("Expected identifier".to_string()));
        }

        Ok(self.input[start..self.pos].to_string())
    }

    /// Collect text until the next tag or escape sequence.
    fn collect_text(&mut self) -> String {
        let start = self.pos;

        while self.pos < self.input.len() {
            if self.peek_str("{{") || self.peek_str("\\{{") {
                break;
            }
            self.advance();
        }

        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn current_char(&self) -> char {
        self.peek_char().unwrap_or('\0')
    }

    fn advance(&mut self) {
        if self.pos < self.input.len() {
            self.pos += self.current_char().len_utf8();
        }
    }

    /// Expect a specific string and consume it.
    fn expect(&mut self, s: &str) -> Result<()> {
        if self.peek_str(s) {
            self.pos += s.len();
            Ok(())
        } else {
            let found: String = self.input[self.pos..].chars().take(10).collect();
            Err(TemplateError::Parse(format!(
                "Expected '{s}' but found '{found}'"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<Node>> {
        Parser::new(input).parse()
    }

    #[test]
    fn test_parse_text_and_variables() {
        assert_eq!(
            parse("<h1>{{ post.title }}</h1>").unwrap(),
            vec![
                Node::Text("<h1>".to_string()),
                Node::Variable("post.title".to_string()),
                Node::Text("</h1>".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_raw() {
        assert_eq!(
            parse("{{{content}}}").unwrap(),
            vec![Node::Raw("content".to_string())]
        );
        assert!(parse("{{{content}}").is_err());
    }

    #[test]
    fn test_parse_comment() {
        assert_eq!(
            parse("a{{! note }}b").unwrap(),
            vec![Node::Text("a".to_string()), Node::Text("b".to_string())]
        );
        assert!(parse("{{! never closed").is_err());
    }

    #[test]
    fn test_parse_loop_variables() {
        assert_eq!(
            parse("{{@index}}").unwrap(),
            vec![Node::Variable("@index".to_string())]
        );
    }

    #[test]
    fn test_parse_if_else() {
        assert_eq!(
            parse("{{#if a}}yes{{else}}no{{/if}}").unwrap(),
            vec![Node::If {
                condition: "a".to_string(),
                then_branch: vec![Node::Text("yes".to_string())],
                else_branch: vec![Node::Text("no".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_nested_if_in_each() {
        let nodes = parse("{{#each xs as x}}{{#if @first}}F{{else}}-{{/if}}{{x}}{{/each}}").unwrap();
        match &nodes[0] {
            Node::Each {
                variable,
                item_name,
                body,
            } => {
                assert_eq!(variable, "xs");
                assert_eq!(item_name.as_deref(), Some("x"));
                assert_eq!(body.len(), 2);
                assert!(matches!(&body[0], Node::If { else_branch, .. } if else_branch.len() == 1));
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_parse_unless_and_with() {
        assert_eq!(
            parse("{{#unless x}}n{{/unless}}{{#with p}}{{t}}{{/with}}").unwrap(),
            vec![
                Node::Unless {
                    condition: "x".to_string(),
                    body: vec![Node::Text("n".to_string())],
                },
                Node::With {
                    variable: "p".to_string(),
                    body: vec![Node::Variable("t".to_string())],
                },
            ]
        );
    }

    #[test]
    fn test_parse_escaped_braces() {
        assert_eq!(
            parse("\\{{name}}").unwrap(),
            vec![
                Node::Text("{{".to_string()),
                Node::Text("name}}".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("{{name").is_err());
        assert!(parse("{{#if a}}never closed").is_err());
        assert!(parse("{{#loop a}}{{/loop}}").is_err());
        assert!(parse("stray {{/if}}").is_err());
        assert!(parse("{{#each xs}}{{/if}}").is_err());
        assert!(parse("{{else}}").is_err());
    }
}
