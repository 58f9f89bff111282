mod common;

use pretty_assertions::assert_eq;
use rich_text_model::snapshot;
use rich_text_model::{
    BuildError, ChildProblem, EmbedDisplay, ListKind, Mark, MarkKind, MarkProblem, NodeBuilder,
    NodeKind, NodePath, Payload, ResourceReference,
};
use rstest::rstest;
use url::Url;

fn text_list(kind: ListKind, labels: &[&str]) -> NodeBuilder {
    let list = NodeBuilder::list(kind);
    for label in labels {
        let item = NodeBuilder::list_item();
        item.append([NodeBuilder::text(*label)]).unwrap();
        list.append([item]).unwrap();
    }
    list
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
#[case(6)]
fn heading_levels_in_range(#[case] level: u8) {
    let heading = NodeBuilder::heading(level).unwrap();
    heading.append([NodeBuilder::text("Title")]).unwrap();

    let doc = NodeBuilder::document();
    doc.append([heading]).unwrap();
    let doc = doc.finalize().unwrap();

    snapshot::invariants(&doc);
    let snap = snapshot::normalize(&doc);
    assert_eq!(snap.root.children[0].payload, Some(level.to_string()));
}

#[rstest]
#[case(0)]
#[case(7)]
#[case(u8::MAX)]
fn heading_levels_out_of_range(#[case] level: u8) {
    assert_eq!(
        NodeBuilder::heading(level).unwrap_err(),
        BuildError::InvalidHeadingLevel { level }
    );
}

#[rstest]
#[case::text(NodeBuilder::text("x"))]
#[case::block(NodeBuilder::block())]
#[case::list(NodeBuilder::unordered_list())]
#[case::item(NodeBuilder::list_item())]
#[case::rule(NodeBuilder::horizontal_rule())]
#[case::link(NodeBuilder::hyperlink(Url::parse("https://example.com/").unwrap()))]
fn text_rejects_every_child(#[case] child: NodeBuilder) {
    let text = NodeBuilder::text("leaf");
    let err = text.append([child.clone()]).unwrap_err();

    assert!(matches!(
        err,
        BuildError::InvalidChild {
            parent: NodeKind::Text,
            reason: ChildProblem::LeafNode,
            ..
        }
    ));
    assert_eq!(text.child_count(), 0);
    assert!(child.parent().is_none());
}

#[test]
fn ordered_list_keeps_item_order() {
    common::init_logging();
    let doc = NodeBuilder::document();
    doc.append([text_list(
        ListKind::Ordered,
        &["first item", "second item", "third item"],
    )])
    .unwrap();
    let doc = doc.finalize().unwrap();
    snapshot::invariants(&doc);

    let list = doc.node_at(&NodePath::from([0])).unwrap();
    let labels: Vec<String> = list.children().map(|item| item.plain_text()).collect();
    assert_eq!(labels, vec!["first item", "second item", "third item"]);
}

#[test]
fn marks_and_order_survive_finalize() {
    let block = NodeBuilder::block();
    block
        .append([
            NodeBuilder::text_with_marks("loud", [Mark::Bold]),
            NodeBuilder::text_with_marks(
                "louder",
                [Mark::Italic, Mark::Bold, Mark::custom("highlight").unwrap()],
            ),
            NodeBuilder::text("calm"),
        ])
        .unwrap();
    let doc = NodeBuilder::document();
    doc.append([block]).unwrap();
    let doc = doc.finalize().unwrap();
    snapshot::invariants(&doc);

    insta::assert_yaml_snapshot!("marks_and_order", snapshot::normalize(&doc));
    assert_eq!(doc.plain_text(), "loudloudercalm");
}

#[test]
fn repeated_mark_collapses() {
    let text = NodeBuilder::text("loud");
    text.add_mark(Mark::Bold).unwrap();
    text.add_mark(Mark::Bold).unwrap();
    text.add_mark(Mark::from_parts(MarkKind::Bold, None).unwrap())
        .unwrap();

    let block = NodeBuilder::block();
    block.append([text]).unwrap();
    let doc = NodeBuilder::document();
    doc.append([block]).unwrap();
    let doc = doc.finalize().unwrap();

    let run = doc.node_at(&NodePath::from([0, 0])).unwrap();
    assert_eq!(run.marks().len(), 1);
    assert!(run.marks().contains(&Mark::Bold));
}

#[test]
fn custom_mark_needs_a_name() {
    assert_eq!(
        Mark::from_parts(MarkKind::Custom, None).unwrap_err(),
        BuildError::InvalidMark {
            reason: MarkProblem::MissingCustomName
        }
    );
    assert!(Mark::custom("  ").is_err());
}

#[test]
fn sealed_nodes_reject_mutation() {
    let doc = NodeBuilder::document();
    let block = NodeBuilder::block();
    let text = NodeBuilder::text("done");
    block.append([text.clone()]).unwrap();
    doc.append([block]).unwrap();
    let finalized = doc.finalize().unwrap();

    let from_tree = doc.child(0).unwrap();
    assert_eq!(
        from_tree.append([NodeBuilder::text("more")]).unwrap_err(),
        BuildError::SealedNode {
            kind: NodeKind::Block,
            path: NodePath::from([0]),
        }
    );
    assert!(matches!(
        text.add_mark(Mark::Italic),
        Err(BuildError::SealedNode { .. })
    ));
    assert!(matches!(
        NodeBuilder::block().append([text.clone()]),
        Err(BuildError::SealedNode { .. })
    ));
    assert_eq!(finalized.plain_text(), "done");
}

#[test]
fn deeply_nested_custom_lists() {
    let markers = ["1", "A", "a", "I"];

    // Build from the innermost list outwards.
    let mut inner: Option<NodeBuilder> = None;
    for marker in markers.iter().rev() {
        let item = NodeBuilder::list_item();
        item.append([NodeBuilder::text(format!("level {marker}"))])
            .unwrap();
        if let Some(nested) = inner.take() {
            item.append([nested]).unwrap();
        }
        let list = NodeBuilder::list(ListKind::Custom(marker.to_string()));
        list.append([item]).unwrap();
        inner = Some(list);
    }

    let doc = NodeBuilder::document();
    doc.append(inner).unwrap();
    let doc = doc.finalize().unwrap();
    snapshot::invariants(&doc);

    let lists: Vec<String> = doc
        .walk()
        .filter(|(_, node)| node.kind() == NodeKind::List)
        .map(|(path, node)| match node.payload() {
            Payload::List(kind) => format!("{path} {kind}"),
            other => panic!("unexpected payload {other:?}"),
        })
        .collect();
    assert_eq!(
        lists,
        vec![
            "/0 custom(1)",
            "/0/0/1 custom(A)",
            "/0/0/1/0/1 custom(a)",
            "/0/0/1/0/1/0/1 custom(I)",
        ]
    );
    assert_eq!(doc.plain_text(), "level 1level Alevel alevel I");
}

#[test]
fn links_never_nest() {
    let link = || NodeBuilder::hyperlink(Url::parse("https://example.com/docs").unwrap());
    let embed = || NodeBuilder::embedded_link(ResourceReference::entry("fake_id"), EmbedDisplay::Inline);

    let outer = link();
    let label = NodeBuilder::text("docs");
    outer.append([label]).unwrap();

    // Every way of getting a link below another one fails at attach time.
    for candidate in [link(), embed()] {
        assert!(outer.append([candidate]).is_err());
    }
    let labelled = embed();
    labelled.append([NodeBuilder::text("see")]).unwrap();
    assert!(outer.append([labelled]).is_err());

    let block = NodeBuilder::block();
    block.append([outer.clone(), embed()]).unwrap();
    assert!(outer.append([embed()]).is_err());

    let doc = NodeBuilder::document();
    doc.append([block]).unwrap();
    let doc = doc.finalize().unwrap();
    snapshot::invariants(&doc);

    let links = doc.walk().filter(|(_, node)| node.kind().is_link()).count();
    assert_eq!(links, 2);
}

#[test]
fn mixed_document_snapshot() {
    let heading = NodeBuilder::heading(2).unwrap();
    heading.append([NodeBuilder::text("Intro")]).unwrap();

    let embed = NodeBuilder::embedded_link(ResourceReference::entry("fake_id"), EmbedDisplay::Inline);
    embed.add_mark(Mark::Italic).unwrap();
    let link = NodeBuilder::hyperlink(Url::parse("https://example.com/docs").unwrap());
    link.append([NodeBuilder::text("docs")]).unwrap();
    let block = NodeBuilder::block();
    block
        .append([NodeBuilder::text("see "), embed, NodeBuilder::text(" or "), link])
        .unwrap();

    let doc = NodeBuilder::document();
    doc.append([
        heading,
        block,
        NodeBuilder::horizontal_rule(),
        text_list(ListKind::Unordered, &["one"]),
    ])
    .unwrap();
    let doc = doc.finalize().unwrap();

    snapshot::invariants(&doc);

    insta::assert_yaml_snapshot!("heading_block_and_rule", snapshot::normalize(&doc));
}
