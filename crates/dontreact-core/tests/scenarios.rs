use std::cell::Cell;
use std::rc::Rc;

use dontreact_core::prelude::*;

const HEADING_CLASS: &str = "text-5xl font-extrabold tracking-tight";

#[derive(Clone, Debug, Default, PartialEq)]
struct Toggle {
    is_on: bool,
}

struct TitleProps {
    title: &'static str,
}

fn title() -> Component<TitleProps, Toggle> {
    Component::with_default("Title", Toggle::default(), |props: &TitleProps, state, cx| {
        let cx2 = cx.clone();
        let next = Toggle {
            is_on: !state.is_on,
        };
        Ok(Element::new("h1")
            .on_click(move || cx2.set_state(next.clone()))
            .class_name(HEADING_CLASS)
            .child(props.title)
            .child(if state.is_on { "On" } else { "Off" })
            .with_state(state)
            .with_context(cx))
    })
}

fn subtitle() -> Component<&'static str, Toggle> {
    Component::new("Subtitle", |text, state, cx| {
        Ok(Element::new("h2")
            .child(*text)
            .with_state(state)
            .with_context(cx))
    })
}

/// Root with the given title text and, optionally, a subtitle.
fn app(with_subtitle: bool) -> Component<&'static str, Toggle> {
    let (title, subtitle) = (title(), subtitle());
    Component::with_default("App", Toggle::default(), move |heading, state, cx| {
        let mut root = Element::new("div")
            .class_name(HEADING_CLASS)
            .child(factory(&title, TitleProps { title: *heading }));
        if with_subtitle {
            root = root.child(factory(&subtitle, "Subtitle"));
        }
        Ok(root.with_state(state).with_context(cx))
    })
}

fn container() -> Node {
    Node::create_element("div").unwrap()
}

#[test]
fn test_clicking_the_heading_toggles_on_and_off() {
    let root = container();
    let _handle = mount(&root, &app(false), "Hello", ContextExtras::new()).unwrap();
    assert_eq!(root.text_content(), "HelloOff");

    root.find_by_tag("h1").unwrap().click().unwrap();
    assert_eq!(root.text_content(), "HelloOn");

    // the old heading was discarded; click the new one
    root.find_by_tag("h1").unwrap().click().unwrap();
    assert_eq!(root.text_content(), "HelloOff");
}

#[test]
fn test_title_and_subtitle_render_in_order() {
    let root = container();
    let _handle = mount(&root, &app(true), "Main title", ContextExtras::new()).unwrap();

    let outer = root.first_child().unwrap();
    let kids = outer.children();
    assert_eq!(kids.len(), 2);
    assert_eq!(kids[0].tag().as_deref(), Some("h1"));
    assert_eq!(kids[0].text_content(), "Main titleOff");
    assert_eq!(kids[1].tag().as_deref(), Some("h2"));
    assert_eq!(kids[1].text_content(), "Subtitle");

    insta::assert_snapshot!(
        root.inner_html(),
        @r#"<div class="text-5xl font-extrabold tracking-tight"><h1 class="text-5xl font-extrabold tracking-tight">Main titleOff</h1><h2>Subtitle</h2></div>"#
    );
}

#[test]
fn test_rerender_replaces_every_node() {
    let root = container();
    let handle = mount(&root, &app(true), "Main title", ContextExtras::new()).unwrap();
    let before = root.first_child().unwrap();
    let heading_before = root.find_by_tag("h1").unwrap();

    handle.set_state(Toggle { is_on: true }).unwrap();

    let after = root.first_child().unwrap();
    assert_eq!(root.child_count(), 1);
    assert!(!before.ptr_eq(&after));
    assert!(!heading_before.ptr_eq(&root.find_by_tag("h1").unwrap()));
    assert_eq!(after.find_by_tag("h1").unwrap().text_content(), "Main titleOn");
    assert_eq!(handle.state(), Some(Toggle { is_on: true }));
}

#[test]
fn test_same_state_renders_structurally_equal_trees() {
    let root = container();
    let handle = mount(&root, &app(true), "Main title", ContextExtras::new()).unwrap();
    let first = root.snapshot();
    handle.set_state(Toggle::default()).unwrap();
    assert_eq!(first, root.snapshot());

    let json = serde_json::to_string(&root.find_by_tag("h1").unwrap().snapshot()).unwrap();
    insta::assert_snapshot!(
        json,
        @r#"{"kind":"element","tag":"h1","class_name":"text-5xl font-extrabold tracking-tight","listeners":["click"],"children":[{"kind":"text","content":"Main title"},{"kind":"text","content":"Off"}]}"#
    );
}

#[test]
fn test_click_binding_never_becomes_an_attribute() {
    let root = container();
    let _handle = mount(&root, &app(false), "Hello", ContextExtras::new()).unwrap();
    let heading = root.find_by_tag("h1").unwrap();
    assert_eq!(heading.listener_count(EventKind::Click), 1);
    assert_eq!(heading.attribute("onClick"), None);
    assert!(heading.attributes().is_empty());
}

#[test]
fn test_own_children_take_precedence_over_props_children() {
    let comp: Component<(), ()> = Component::new("Both", |_, _, cx| {
        Ok(Element::new("section")
            .props(Props::new().with("role", "note").with_children("B"))
            .children("A")
            .with_context(cx))
    });
    let root = container();
    let _handle = mount(&root, &comp, (), ContextExtras::new()).unwrap();
    assert_eq!(root.text_content(), "A");
    assert_eq!(root.inner_html(), "<section>A</section>");
}

#[test]
fn test_descriptor_children_share_the_pass_context() {
    let passes = Rc::new(Cell::new((0, 0)));
    let leaf: Component<(), u8> = Component::new("Leaf", {
        let passes = passes.clone();
        move |_, _, cx| {
            let (first, _) = passes.get();
            passes.set((first, cx.pass()));
            Ok(Element::new("i"))
        }
    });
    let comp: Component<(), u8> = Component::with_default("Wrapper", 0, {
        let passes = passes.clone();
        move |_, n, cx| {
            passes.set((cx.pass(), 0));
            Ok(Element::new("div")
                .child(Element::new("p").child(factory(&leaf, ())))
                .with_state(n))
        }
    });

    let root = container();
    let handle = mount(&root, &comp, (), ContextExtras::new()).unwrap();
    assert_eq!(passes.get(), (1, 1));
    handle.set_state(9).unwrap();
    assert_eq!(passes.get(), (2, 2));
}
