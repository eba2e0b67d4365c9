use indoc::indoc;

use super::helpers::{module_snapshot, parse};

#[test]
fn full_module_shape() {
    let source = indoc! {r#"
        // Flight helpers

        const MAX_SPEED : float = 120.5

        pub sync fn clamp(value : float, limit : float = 120.5) -> float = {
            if (value > limit) limit else value
        }

        type Vec2 = (x : float, y : float)

        impl Vec2 {
            sync fn length_squared(self) -> float = self.x * self.x + self.y * self.y
        }
    "#};

    assert_eq!(
        module_snapshot(source),
        indoc! {r#"
            Module test
              Comment " Flight helpers"
              Constant MAX_SPEED : float
                Float 120.5
              SyncFunction clamp(value : float, limit : float = ...) -> float
                Block
                  If
                    Binary >
                      Variable value
                      Variable limit
                    Variable limit
                    Variable value
              Type Vec2 = (x : float, y : float)
              Impl Vec2
                SyncFunction length_squared(self) -> float
                  Binary +
                    Binary *
                      FieldGet x
                        Variable self
                      FieldGet x
                        Variable self
                    Binary *
                      FieldGet y
                        Variable self
                      FieldGet y
                        Variable self
        "#}
    );
}

#[test]
fn union_type_declaration() {
    assert_eq!(
        module_snapshot("type Number = int | float"),
        indoc! {"
            Module test
              Type Number = int | float
        "}
    );
}

#[test]
fn async_function_without_sync_marker() {
    let module = parse("pub fn poll() -> Unit = { }");
    let function = module.function("poll").expect("function is declared");
    assert!(function.is_async());
    assert!(function.is_public);
}

#[test]
fn function_type_and_array_type_annotations() {
    assert_eq!(
        module_snapshot("const HANDLERS : sync fn(int) -> bool[] = handlers"),
        indoc! {"
            Module test
              Constant HANDLERS : sync fn(int) -> bool[]
                Variable handlers
        "}
    );
}

#[test]
fn generic_type_reference() {
    assert_eq!(
        module_snapshot("const T : telemetry::Sample<float> = s"),
        indoc! {"
            Module test
              Constant T : telemetry::Sample<float>
                Variable s
        "}
    );
}

#[test]
fn lookup_by_name_per_category() {
    let module = parse(indoc! {"
        const A : int = 1
        sync fn a() -> int = 2
        type A2 = int
    "});
    assert!(module.constant("A").is_some());
    assert!(module.function("a").is_some());
    assert!(module.type_declaration("A2").is_some());
    assert!(module.constant("a").is_none());
}

#[test]
fn redeclaration_keeps_first_occurrence() {
    let module = parse(indoc! {r#"
        const A : int = 1
        const A : string = "two"
    "#});
    let first = module.constant("A").expect("first declaration wins");
    assert_eq!(first.span.start.line, 1);
    // Both declarations are still present in the item list.
    assert_eq!(module.items.len(), 2);
}

#[test]
fn leading_comments_become_description() {
    let module = parse(indoc! {"
        // Maneuver planning
        // and execution.
        const A : int = 1
    "});
    assert_eq!(module.description, "Maneuver planning\nand execution.");
}

#[test]
fn empty_module_parses_clean() {
    let module = parse("");
    assert!(module.items.is_empty());
    assert!(module.syntax_errors().is_empty());
}
