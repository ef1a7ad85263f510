//! Compiled match patterns and their default priorities.
use crate::error::DispatchError;
use nom::IResult;
use nom::Parser;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{consumed, map, opt, recognize, value};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair, preceded, terminated};
use std::collections::HashMap;
use std::fmt;
use xmlrule_tree::{NodeType, TreeNode};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Default priority of an exact-name test.
pub const NAME_PRIORITY: f64 = 0.0;
/// Default priority of a namespace wildcard (`ns:*`).
pub const NAMESPACE_PRIORITY: f64 = -0.25;
/// Default priority of a node-type test or the universal pattern.
pub const TYPE_PRIORITY: f64 = -0.5;

/// The test a pattern applies to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternTest {
    /// Matches every node.
    Any,
    /// Matches every node of one category (`*`, `@*`, `text()`, `/`, ...).
    NodeType(NodeType),
    /// Matches nodes of one category whose name is in `uri`.
    Namespace { node_type: NodeType, uri: String },
    /// Matches nodes of one category with exactly this expanded name.
    Name {
        node_type: NodeType,
        namespace: Option<String>,
        local: String,
    },
}

/// A compiled, immutable node-matching predicate with its priority.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    test: PatternTest,
    priority: Option<f64>,
    text: String,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl Pattern {
    fn from_test(test: PatternTest) -> Self {
        let text = describe(&test);
        Pattern {
            test,
            priority: None,
            text,
        }
    }

    /// The universal pattern: matches any node.
    pub fn any() -> Self {
        Pattern::from_test(PatternTest::Any)
    }

    /// Matches the document node (`/`).
    pub fn document() -> Self {
        Pattern::from_test(PatternTest::NodeType(NodeType::Document))
    }

    pub fn node_type(node_type: NodeType) -> Self {
        Pattern::from_test(PatternTest::NodeType(node_type))
    }

    pub fn namespace(node_type: NodeType, uri: impl Into<String>) -> Self {
        Pattern::from_test(PatternTest::Namespace {
            node_type,
            uri: uri.into(),
        })
    }

    pub fn name(node_type: NodeType, namespace: Option<&str>, local: impl Into<String>) -> Self {
        Pattern::from_test(PatternTest::Name {
            node_type,
            namespace: namespace.map(str::to_string),
            local: local.into(),
        })
    }

    /// An element in no namespace with this local name.
    pub fn element(local: impl Into<String>) -> Self {
        Pattern::name(NodeType::Element, None, local)
    }

    /// An attribute in no namespace with this local name.
    pub fn attribute(local: impl Into<String>) -> Self {
        Pattern::name(NodeType::Attribute, None, local)
    }

    /// Overrides the specificity-derived priority.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Parses a single pattern alternative with no prefixes bound.
    pub fn parse(text: &str) -> Result<Self, DispatchError> {
        Pattern::parse_with(text, &Namespaces::default())
    }

    /// Parses a single pattern alternative, resolving prefixes through `namespaces`.
    pub fn parse_with(text: &str, namespaces: &Namespaces) -> Result<Self, DispatchError> {
        let mut patterns = parse_union(text, namespaces)?;
        if patterns.len() != 1 {
            return Err(DispatchError::PatternParse(
                text.to_string(),
                "expected a single alternative; use parse_union for '|'".to_string(),
            ));
        }
        Ok(patterns.remove(0))
    }

    pub fn test(&self) -> &PatternTest {
        &self.test
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The priority implied by how specific the test is.
    pub fn default_priority(&self) -> f64 {
        match self.test {
            PatternTest::Name { .. } => NAME_PRIORITY,
            PatternTest::Namespace { .. } => NAMESPACE_PRIORITY,
            PatternTest::NodeType(_) | PatternTest::Any => TYPE_PRIORITY,
        }
    }

    /// The explicit priority if one was given, else the default.
    pub fn priority(&self) -> f64 {
        self.priority.unwrap_or_else(|| self.default_priority())
    }

    /// The local name this pattern is restricted to, if it is name-specific.
    pub fn matches_name(&self) -> Option<&str> {
        match &self.test {
            PatternTest::Name { local, .. } => Some(local),
            _ => None,
        }
    }

    pub fn matches<N: TreeNode>(&self, node: N) -> bool {
        match &self.test {
            PatternTest::Any => true,
            PatternTest::NodeType(node_type) => node.node_type() == *node_type,
            PatternTest::Namespace { node_type, uri } => {
                node.node_type() == *node_type && node.namespace_uri() == Some(uri.as_str())
            }
            PatternTest::Name {
                node_type,
                namespace,
                local,
            } => {
                node.node_type() == *node_type
                    && node.name().is_some_and(|q| {
                        q.local_part == local.as_str() && q.namespace == namespace.as_deref()
                    })
            }
        }
    }
}

fn describe(test: &PatternTest) -> String {
    fn axis_prefix(node_type: &NodeType) -> &'static str {
        if *node_type == NodeType::Attribute { "@" } else { "" }
    }

    match test {
        PatternTest::Any => "node()".to_string(),
        PatternTest::NodeType(node_type) => match node_type {
            NodeType::Document => "/".to_string(),
            NodeType::Element => "*".to_string(),
            NodeType::Attribute => "@*".to_string(),
            NodeType::Text => "text()".to_string(),
            NodeType::Comment => "comment()".to_string(),
            NodeType::ProcessingInstruction => "processing-instruction()".to_string(),
        },
        PatternTest::Namespace { node_type, uri } => {
            format!("{}Q{{{}}}*", axis_prefix(node_type), uri)
        }
        PatternTest::Name {
            node_type,
            namespace,
            local,
        } => match namespace {
            Some(uri) => format!("{}Q{{{}}}{}", axis_prefix(node_type), uri, local),
            None => format!("{}{}", axis_prefix(node_type), local),
        },
    }
}

/// Prefix bindings used to resolve `prefix:name` in pattern text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    bindings: HashMap<String, String>,
}

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prefix: &str, uri: &str) -> Self {
        self.bind(prefix, uri);
        self
    }

    pub fn bind(&mut self, prefix: &str, uri: &str) {
        self.bindings.insert(prefix.to_string(), uri.to_string());
    }

    /// The URI bound to `prefix`. `xml` is always bound.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        match self.bindings.get(prefix) {
            Some(uri) => Some(uri),
            None if prefix == "xml" => Some(XML_NAMESPACE),
            None => None,
        }
    }
}

// --- Parser ---

/// A name test before prefixes are resolved.
#[derive(Debug, Clone, PartialEq)]
enum NameTest<'a> {
    Wildcard,
    PrefixWildcard(&'a str),
    UriWildcard(&'a str),
    Prefixed(&'a str, &'a str),
    Expanded(&'a str, &'a str),
    Local(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
enum RawPattern<'a> {
    Document,
    Any,
    Kind(NodeType),
    Named(NodeType, NameTest<'a>),
}

/// Parses `a|b|c` into one pattern per alternative, each with its own default priority.
pub fn parse_union(text: &str, namespaces: &Namespaces) -> Result<Vec<Pattern>, DispatchError> {
    let alternatives = match union_parser(text.trim()) {
        Ok(("", alternatives)) => alternatives,
        Ok((rem, _)) => {
            return Err(DispatchError::PatternParse(
                text.to_string(),
                format!("Unconsumed input in pattern: {}", rem),
            ));
        }
        Err(e) => return Err(DispatchError::PatternParse(text.to_string(), e.to_string())),
    };

    alternatives
        .into_iter()
        .map(|(source, raw)| {
            let test = resolve(raw, namespaces)
                .map_err(|message| DispatchError::PatternParse(text.to_string(), message))?;
            Ok(Pattern {
                test,
                priority: None,
                text: source.trim().to_string(),
            })
        })
        .collect()
}

fn resolve(raw: RawPattern<'_>, namespaces: &Namespaces) -> Result<PatternTest, String> {
    let lookup = |prefix: &str| {
        namespaces
            .resolve(prefix)
            .map(str::to_string)
            .ok_or_else(|| format!("Undeclared namespace prefix '{}'", prefix))
    };

    Ok(match raw {
        RawPattern::Document => PatternTest::NodeType(NodeType::Document),
        RawPattern::Any => PatternTest::Any,
        RawPattern::Kind(node_type) => PatternTest::NodeType(node_type),
        RawPattern::Named(node_type, name_test) => match name_test {
            NameTest::Wildcard => PatternTest::NodeType(node_type),
            NameTest::PrefixWildcard(prefix) => PatternTest::Namespace {
                node_type,
                uri: lookup(prefix)?,
            },
            NameTest::UriWildcard(uri) => PatternTest::Namespace {
                node_type,
                uri: uri.to_string(),
            },
            NameTest::Prefixed(prefix, local) => PatternTest::Name {
                node_type,
                namespace: Some(lookup(prefix)?),
                local: local.to_string(),
            },
            NameTest::Expanded(uri, local) => PatternTest::Name {
                node_type,
                namespace: (!uri.is_empty()).then(|| uri.to_string()),
                local: local.to_string(),
            },
            NameTest::Local(local) => PatternTest::Name {
                node_type,
                namespace: None,
                local: local.to_string(),
            },
        },
    })
}

fn union_parser(input: &str) -> IResult<&str, Vec<(&str, RawPattern<'_>)>> {
    separated_list1(
        char('|'),
        consumed(delimited(multispace0, alternative, multispace0)),
    )
    .parse(input)
}

fn alternative(input: &str) -> IResult<&str, RawPattern<'_>> {
    alt((
        map(preceded(char('@'), name_test), |nt| {
            RawPattern::Named(NodeType::Attribute, nt)
        }),
        kind_test,
        map(name_test, |nt| RawPattern::Named(NodeType::Element, nt)),
        value(RawPattern::Document, char('/')),
    ))
    .parse(input)
}

fn kind_test(input: &str) -> IResult<&str, RawPattern<'_>> {
    terminated(
        alt((
            value(RawPattern::Any, tag("node")),
            value(RawPattern::Kind(NodeType::Text), tag("text")),
            value(RawPattern::Kind(NodeType::Comment), tag("comment")),
            value(
                RawPattern::Kind(NodeType::ProcessingInstruction),
                tag("processing-instruction"),
            ),
        )),
        pair(delimited(multispace0, char('('), multispace0), char(')')),
    )
    .parse(input)
}

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.'),
    ))
    .parse(input)
}

fn braced_uri(input: &str) -> IResult<&str, &str> {
    delimited(tag("Q{"), take_while(|c| c != '}'), char('}')).parse(input)
}

fn name_test(input: &str) -> IResult<&str, NameTest<'_>> {
    alt((
        value(NameTest::Wildcard, char('*')),
        map(terminated(braced_uri, char('*')), NameTest::UriWildcard),
        map(pair(braced_uri, nc_name), |(uri, local)| {
            NameTest::Expanded(uri, local)
        }),
        map(terminated(nc_name, tag(":*")), NameTest::PrefixWildcard),
        map(
            pair(nc_name, opt(preceded(char(':'), nc_name))),
            |(first, second)| match second {
                Some(local) => NameTest::Prefixed(first, local),
                None => NameTest::Local(first),
            },
        ),
    ))
    .parse(input)
}
