//! Login Page Demo - Declarative Page Objects
//!
//! Demonstrates the page-object workflow end to end:
//! - declaring nested selector positions once
//! - lazy resolution against a live (mock) document
//! - indexed addressing of repeated regions
//! - extension members with per-node state
//!
//! # Running
//!
//! ```bash
//! cargo run --example login_page -p pagina
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use pagina::{selector, selector_with, Definition, DomQuery, MockDom, Page};
use serde_json::Value;

fn main() {
    // RUST_LOG=pagina=trace shows every resolution step
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Pagina Login Page Demo ===\n");

    let dom = Rc::new(RefCell::new(MockDom::new()));
    build_login_document(&mut dom.borrow_mut());

    let page = Page::new(dom.clone(), dom.borrow().root(), login_page_definition());

    demo_field_assertions(&page);
    demo_indexed_errors(&page);
    demo_extensions(&page);
    demo_rerender(&page, &dom);

    println!("\n=== Demo Complete ===");
}

fn build_login_document(dom: &mut MockDom) {
    let root = dom.root();
    let form = dom.append(root, "form", &[("id", "login")], "");
    dom.append(
        form,
        "input",
        &[("name", "username"), ("placeholder", "Username")],
        "",
    );
    dom.append(
        form,
        "input",
        &[("name", "password"), ("placeholder", "Password")],
        "",
    );
    dom.append(form, "button", &[("type", "submit")], "Sign in");
    let errors = dom.append(form, "ul", &[("class", "errors")], "");
    dom.append(errors, "li", &[], "Unknown username");
    dom.append(errors, "li", &[], "Password required");
}

fn login_page_definition() -> Definition {
    Definition::new().child(
        "form",
        selector_with(
            "form#login",
            Definition::new()
                .child("username", selector("input[name=username]"))
                .child("password", selector("input[name=password]"))
                .child("submit", selector("button[type=submit]"))
                .child("errors", selector(".errors li"))
                .value("label", "login form")
                .getter("submit_label", |node| {
                    Value::from(node.child("submit").text().unwrap_or_default())
                }),
        ),
    )
}

fn demo_field_assertions(page: &Page) {
    println!("--- Field assertions ---\n");

    let form = page.child("form");
    for field in ["username", "password", "submit"] {
        let result = form.child(field).assert().exists_count(1);
        println!("form.{field} exists: {}", result.passed);
    }
    let text = form.child("submit").assert().has_text("Sign in");
    println!("submit has text 'Sign in': {}\n", text.passed);
}

fn demo_indexed_errors(page: &Page) {
    println!("--- Indexed addressing ---\n");

    let errors = page.child("form").child("errors");
    println!("error count: {}", errors.assert().count());
    for i in 0..3 {
        match errors.at(i).text() {
            Some(text) => println!("errors[{i}]: {text}"),
            None => println!("errors[{i}]: no match"),
        }
    }
    println!();
}

fn demo_extensions(page: &Page) {
    println!("--- Extension members ---\n");

    let form = page.child("form");
    println!("label: {}", form.get("label").unwrap());
    println!("submit_label: {}", form.get("submit_label").unwrap());

    // per-node state: overriding one handle leaves others untouched
    let other = page.child("form");
    form.set("label", "primary login form");
    println!(
        "after set: {} / {}\n",
        form.get("label").unwrap(),
        other.get("label").unwrap()
    );
}

fn demo_rerender(page: &Page, dom: &Rc<RefCell<MockDom>>) {
    println!("--- Re-render tracking ---\n");

    let errors = page.child("form").child("errors");
    println!("errors before: {}", errors.assert().count());

    // the page object needs no refresh; resolution re-queries the document
    {
        let mut dom = dom.borrow_mut();
        let root = dom.root();
        let list = dom.query_first(root, ".errors").expect("errors list");
        dom.remove(list);
    }
    println!("errors after clearing: {}", errors.assert().count());
    let gone = errors.assert().does_not_exist();
    println!("does_not_exist passes: {}", gone.passed);
}
