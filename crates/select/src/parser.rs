//! A `nom`-based parser for selection paths.

use crate::ast::*;
use crate::error::SelectError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize, value},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};

pub fn parse_path(text: &str) -> Result<PathExpr, SelectError> {
    match path_expr(text.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(SelectError::Parse {
            expression: text.to_string(),
            message: format!("Parser did not consume all input. Remainder: '{}'", rem),
        }),
        Err(e) => Err(SelectError::Parse {
            expression: text.to_string(),
            message: e.to_string(),
        }),
    }
}

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn descendant_or_self_step() -> Step {
    Step::new(Axis::DescendantOrSelf, NodeTest::NodeType(NodeTypeTest::Node))
}

fn path_expr(input: &str) -> IResult<&str, PathExpr> {
    map(separated_list1(ws(char('|')), location_path), |branches| {
        PathExpr { branches }
    })
    .parse(input)
}

fn location_path(input: &str) -> IResult<&str, LocationPath> {
    let (input, _) = multispace0::<&str, nom::error::Error<&str>>(input)?;

    if let Ok((rest, _)) = tag::<&str, &str, nom::error::Error<&str>>("//").parse(input) {
        let (rest, mut steps) = relative_steps(rest)?;
        steps.insert(0, descendant_or_self_step());
        return Ok((
            rest,
            LocationPath {
                is_absolute: true,
                steps,
            },
        ));
    }

    if let Ok((rest, _)) = char::<&str, nom::error::Error<&str>>('/').parse(input) {
        // A bare "/" selects the document node.
        return match relative_steps(rest) {
            Ok((rest, steps)) => Ok((
                rest,
                LocationPath {
                    is_absolute: true,
                    steps,
                },
            )),
            Err(nom::Err::Error(_)) => Ok((
                rest,
                LocationPath {
                    is_absolute: true,
                    steps: vec![],
                },
            )),
            Err(e) => Err(e),
        };
    }

    let (rest, steps) = relative_steps(input)?;
    Ok((
        rest,
        LocationPath {
            is_absolute: false,
            steps,
        },
    ))
}

// After the first step, subsequent steps MUST be preceded by / or //.
fn relative_steps(input: &str) -> IResult<&str, Vec<Step>> {
    let (rest, first) = step(input)?;
    let (rest, remainder) = many0(pair(alt((tag("//"), tag("/"))), step)).parse(rest)?;

    let mut steps = vec![first];
    for (sep, next_step) in remainder {
        if sep == "//" {
            steps.push(descendant_or_self_step());
        }
        steps.push(next_step);
    }
    Ok((rest, steps))
}

fn step(input: &str) -> IResult<&str, Step> {
    let any_node = NodeTest::NodeType(NodeTypeTest::Node);
    let (rest, (axis, node_test)) = ws(alt((
        value((Axis::Parent, any_node.clone()), tag("..")),
        value((Axis::SelfAxis, any_node), tag(".")),
        map(preceded(char('@'), node_test), |nt| (Axis::Attribute, nt)),
        map(pair(opt(axis), node_test), |(ax, nt)| {
            (ax.unwrap_or(Axis::Child), nt)
        }),
    )))
    .parse(input)?;
    let (rest, predicates) = many0(predicate).parse(rest)?;
    Ok((
        rest,
        Step {
            axis,
            node_test,
            predicates,
        },
    ))
}

fn axis(input: &str) -> IResult<&str, Axis> {
    terminated(
        alt((
            value(Axis::Child, tag("child")),
            value(Axis::DescendantOrSelf, tag("descendant-or-self")),
            value(Axis::Descendant, tag("descendant")),
            value(Axis::Attribute, tag("attribute")),
            value(Axis::Parent, tag("parent")),
            value(Axis::AncestorOrSelf, tag("ancestor-or-self")),
            value(Axis::Ancestor, tag("ancestor")),
            value(Axis::SelfAxis, tag("self")),
            value(Axis::FollowingSibling, tag("following-sibling")),
            value(Axis::PrecedingSibling, tag("preceding-sibling")),
        )),
        tag("::"),
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

fn node_type_test(input: &str) -> IResult<&str, NodeTest> {
    map(
        terminated(
            alt((
                value(NodeTypeTest::Text, tag("text")),
                value(NodeTypeTest::Node, tag("node")),
                value(NodeTypeTest::Comment, tag("comment")),
                value(
                    NodeTypeTest::ProcessingInstruction,
                    tag("processing-instruction"),
                ),
            )),
            pair(ws(char('(')), char(')')),
        ),
        NodeTest::NodeType,
    )
    .parse(input)
}

pub fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        value(NodeTest::Wildcard, char('*')),
        node_type_test,
        map(terminated(nc_name, tag(":*")), |prefix: &str| {
            NodeTest::PrefixWildcard(prefix.to_string())
        }),
        map(
            pair(nc_name, opt(preceded(char(':'), nc_name))),
            |(first, second): (&str, Option<&str>)| match second {
                Some(local) => NodeTest::Name {
                    prefix: Some(first.to_string()),
                    local: local.to_string(),
                },
                None => NodeTest::Name {
                    prefix: None,
                    local: first.to_string(),
                },
            },
        ),
    ))
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    delimited(
        ws(char('[')),
        alt((
            value(
                Predicate::Last,
                pair(tag("last"), pair(ws(char('(')), char(')'))),
            ),
            map_res(digit1, |digits: &str| {
                digits.parse::<usize>().map(Predicate::Position)
            }),
        )),
        ws(char(']')),
    )
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> LocationPath {
        let mut expr = parse_path(text).unwrap();
        assert_eq!(expr.branches.len(), 1);
        expr.branches.remove(0)
    }

    #[test]
    fn test_parse_simple_path() {
        let path = single("foo/bar");
        assert!(!path.is_absolute);
        assert_eq!(
            path.steps,
            vec![
                Step::new(
                    Axis::Child,
                    NodeTest::Name {
                        prefix: None,
                        local: "foo".into()
                    }
                ),
                Step::new(
                    Axis::Child,
                    NodeTest::Name {
                        prefix: None,
                        local: "bar".into()
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_parse_axes() {
        let path = single("following-sibling::foo");
        assert_eq!(path.steps[0].axis, Axis::FollowingSibling);

        let path = single("ancestor-or-self::*");
        assert_eq!(path.steps[0].axis, Axis::AncestorOrSelf);
        assert_eq!(path.steps[0].node_test, NodeTest::Wildcard);

        let path = single("child::*");
        assert_eq!(path.steps[0].axis, Axis::Child);
    }

    #[test]
    fn test_parse_abbreviations() {
        let path = single("../@id");
        assert_eq!(path.steps[0].axis, Axis::Parent);
        assert_eq!(path.steps[1].axis, Axis::Attribute);

        let path = single(".//para");
        assert_eq!(path.steps.len(), 3);
        assert_eq!(path.steps[0].axis, Axis::SelfAxis);
        assert_eq!(path.steps[1].axis, Axis::DescendantOrSelf);
    }

    #[test]
    fn test_parse_absolute() {
        let root = single("/");
        assert!(root.is_absolute);
        assert!(root.steps.is_empty());

        let path = single("//item");
        assert!(path.is_absolute);
        assert_eq!(path.steps.len(), 2);
    }

    #[test]
    fn test_parse_node_tests() {
        assert_eq!(
            single("text()").steps[0].node_test,
            NodeTest::NodeType(NodeTypeTest::Text)
        );
        assert_eq!(
            single("x:*").steps[0].node_test,
            NodeTest::PrefixWildcard("x".into())
        );
        assert_eq!(
            single("x:item").steps[0].node_test,
            NodeTest::Name {
                prefix: Some("x".into()),
                local: "item".into()
            }
        );
        // A name that merely starts like a node type test stays a name.
        assert_eq!(
            single("textual").steps[0].node_test,
            NodeTest::Name {
                prefix: None,
                local: "textual".into()
            }
        );
    }

    #[test]
    fn test_parse_predicates_and_union() {
        let expr = parse_path("item[2] | item[last()]").unwrap();
        assert_eq!(expr.branches.len(), 2);
        assert_eq!(expr.branches[0].steps[0].predicates, vec![Predicate::Position(2)]);
        assert_eq!(expr.branches[1].steps[0].predicates, vec![Predicate::Last]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_path("item["),
            Err(SelectError::Parse { .. })
        ));
        assert!(parse_path("").is_err());
        assert!(parse_path("a b").is_err());
    }
}
