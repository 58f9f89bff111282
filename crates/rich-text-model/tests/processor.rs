use pretty_assertions::assert_eq;
use rich_text_model::{
    Context, KindChecker, ListKind, Mark, Node, NodeBuilder, NodeKind, Payload, Processor,
};

/// Tracks list numbering the way a plain-text renderer would.
#[derive(Default)]
struct Numbering {
    index: Vec<usize>,
    depth: usize,
}

impl Context for Numbering {
    fn on_container_entered(&mut self, _node: &Node) {
        self.depth += 1;
    }

    fn on_container_exited(&mut self, _node: &Node) {
        self.depth -= 1;
    }

    fn on_sibling_encountered(&mut self, node: &Node, index: usize) {
        if node.kind() == NodeKind::ListItem {
            self.index.push(index);
        }
    }
}

type Markup = Processor<Numbering, String>;

fn children(processor: &Markup, context: &mut Numbering, node: &Node) -> Option<String> {
    Some(processor.render_children(context, node).concat())
}

fn text(_: &Markup, _: &mut Numbering, node: &Node) -> Option<String> {
    let value = node.text()?;
    Some(if node.marks().contains(&Mark::Bold) {
        format!("**{value}**")
    } else {
        value.to_string()
    })
}

fn item(processor: &Markup, context: &mut Numbering, node: &Node) -> Option<String> {
    let number = context.index.last().copied().unwrap_or_default() + 1;
    let body = processor.render_children(context, node).concat();
    Some(format!("{number}. {body}\n"))
}

fn heading(processor: &Markup, context: &mut Numbering, node: &Node) -> Option<String> {
    let Payload::Heading(level) = node.payload() else {
        return None;
    };
    let hashes = "#".repeat(usize::from(level.get()));
    let body = processor.render_children(context, node).concat();
    Some(format!("{hashes} {body}\n"))
}

fn any(_: &Numbering, _: &Node) -> bool {
    true
}

#[test]
fn renders_a_numbered_list() {
    let title = NodeBuilder::heading(2).unwrap();
    title.append([NodeBuilder::text("Steps")]).unwrap();

    let list = NodeBuilder::list(ListKind::Ordered);
    for (label, bold) in [("first item", false), ("second item", true), ("third item", false)] {
        let run = NodeBuilder::text(label);
        if bold {
            run.add_mark(Mark::Bold).unwrap();
        }
        let entry = NodeBuilder::list_item();
        entry.append([run]).unwrap();
        list.append([entry]).unwrap();
    }

    let doc = NodeBuilder::document();
    doc.append([title, list]).unwrap();
    let doc = doc.finalize().unwrap();

    let mut processor: Markup = Processor::new();
    processor
        .add_renderer(KindChecker(NodeKind::Text), text)
        .add_renderer(KindChecker(NodeKind::Heading), heading)
        .add_renderer(KindChecker(NodeKind::ListItem), item)
        .add_renderer(any, children);

    let mut numbering = Numbering::default();
    let out = processor.render(&mut numbering, doc.root()).unwrap();

    assert_eq!(
        out,
        "## Steps\n1. first item\n2. **second item**\n3. third item\n"
    );
    assert_eq!(numbering.index, vec![0, 1, 2]);
    assert_eq!(numbering.depth, 0);
}
