//! Tenant-scoped persistence methods
//!
//! Rows live behind the `list_data`, `insert_data`, `update_data` and
//! `delete_data_by_id` database routines, addressed by tenant, table
//! identifier and row id. Payloads are stored as protojson.

use super::go::GoWriter;
use super::{EmptyCheck, RequiredField};
use crate::naming::go_string_literal;

pub(crate) fn render_table_name(w: &mut GoWriter, message_name: &str, receiver: &str, table: &str) {
    w.line(format!(
        "// TableName returns the identifier that scopes {} rows in every persistence call.",
        message_name
    ));
    w.open(format!("func (x *{}) TableName() string {{", receiver));
    w.line(format!("return {}", go_string_literal(table)));
    w.close("}");
}

pub(crate) fn render_list(w: &mut GoWriter, message_name: &str, receiver: &str) {
    w.line(format!(
        "// List returns every {} stored for the tenant, keyed by row id.",
        message_name
    ));
    w.open(format!(
        "func (x *{0}) List(db *sql.DB, tenant string) (map[int64]*{0}, error) {{",
        receiver
    ));
    w.line(format!("ret := make(map[int64]*{})", receiver));
    w.blank();
    w.line("rows, err := db.Query(\"SELECT id, data FROM list_data($1, $2)\", tenant, x.TableName())");
    w.open("if err != nil {");
    w.line("return nil, err");
    w.close("}");
    w.line("defer rows.Close()");
    w.blank();
    w.open("for rows.Next() {");
    w.line("var id int64");
    w.line("var data []byte");
    w.open("if err := rows.Scan(&id, &data); err != nil {");
    w.line("return nil, err");
    w.close("}");
    w.blank();
    w.line(format!("row := &{}{{}}", receiver));
    w.open("if err := protojson.Unmarshal(data, row); err != nil {");
    w.line("return nil, err");
    w.close("}");
    w.line("ret[id] = row");
    w.close("}");
    w.blank();
    w.line("return ret, rows.Err()");
    w.close("}");
}

pub(crate) fn render_get(w: &mut GoWriter, message_name: &str, receiver: &str) {
    w.line(format!(
        "// Get loads the {} stored under id for the tenant into x.",
        message_name
    ));
    w.open(format!(
        "func (x *{}) Get(db *sql.DB, tenant string, id int64) error {{",
        receiver
    ));
    w.line("var data []byte");
    w.line("err := db.QueryRow(\"SELECT data FROM list_data($1, $2) WHERE id = $3\",");
    w.line("\ttenant, x.TableName(), id).Scan(&data)");
    w.open("if err != nil {");
    w.line("return err");
    w.close("}");
    w.blank();
    w.line("return protojson.Unmarshal(data, x)");
    w.close("}");
}

pub(crate) fn render_create(
    w: &mut GoWriter,
    message_name: &str,
    receiver: &str,
    required: Option<&RequiredField>,
) {
    w.line(format!(
        "// Create stores x as a new {} for the tenant.",
        message_name
    ));
    w.open(format!(
        "func (x *{}) Create(db *sql.DB, tenant string) error {{",
        receiver
    ));
    if let Some(required) = required {
        w.open(format!("if {} {{", empty_test(required)));
        w.line(format!(
            "return errors.New({})",
            go_string_literal(&format!("{} was not set", required.go_name))
        ));
        w.close("}");
        w.blank();
    }
    w.line("data, err := protojson.Marshal(x)");
    w.open("if err != nil {");
    w.line("return err");
    w.close("}");
    w.blank();
    w.line("_, err = db.Exec(\"CALL insert_data($1, $2, $3)\", tenant, x.TableName(), data)");
    w.line("return err");
    w.close("}");
}

pub(crate) fn render_update(w: &mut GoWriter, message_name: &str, receiver: &str) {
    w.line(format!(
        "// Update replaces the {} stored under id with x.",
        message_name
    ));
    w.open(format!(
        "func (x *{}) Update(db *sql.DB, tenant string, id int64) error {{",
        receiver
    ));
    w.line("data, err := protojson.Marshal(x)");
    w.open("if err != nil {");
    w.line("return err");
    w.close("}");
    w.blank();
    w.line("_, err = db.Exec(\"CALL update_data($1, $2, $3, $4)\",");
    w.line("\ttenant, x.TableName(), id, data)");
    w.line("return err");
    w.close("}");
}

pub(crate) fn render_delete(w: &mut GoWriter, message_name: &str, receiver: &str) {
    w.line(format!(
        "// Delete removes the {} stored under id.",
        message_name
    ));
    w.open(format!(
        "func (x *{}) Delete(db *sql.DB, tenant string, id int64) error {{",
        receiver
    ));
    w.line("_, err := db.Exec(\"CALL delete_data_by_id($1, $2, $3)\",");
    w.line("\ttenant, x.TableName(), id)");
    w.line("return err");
    w.close("}");
}

fn empty_test(required: &RequiredField) -> String {
    let getter = format!("x.Get{}()", required.go_name);
    match required.check {
        EmptyCheck::EmptyString => format!("{} == \"\"", getter),
        EmptyCheck::Zero => format!("{} == 0", getter),
        EmptyCheck::False => format!("!{}", getter),
        EmptyCheck::NoElements => format!("len({}) == 0", getter),
        EmptyCheck::Nil => format!("{} == nil", getter),
    }
}
