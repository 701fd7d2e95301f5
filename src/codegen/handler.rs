//! HTTP list endpoint

use super::go::GoWriter;
use crate::naming::go_string_literal;

pub(crate) fn render_list_handler(
    w: &mut GoWriter,
    message_name: &str,
    receiver: &str,
    tenant_param: &str,
    db_context_key: &str,
) {
    w.line(format!(
        "// ListHandler writes every {} of the tenant named in the route as JSON.",
        message_name
    ));
    w.open(format!(
        "func (x *{}) ListHandler(w http.ResponseWriter, req *http.Request) {{",
        receiver
    ));
    w.line(format!(
        "db, ok := req.Context().Value({}).(*sql.DB)",
        go_string_literal(db_context_key)
    ));
    w.open("if !ok {");
    w.line("http.Error(w, \"database handle missing from request context\", http.StatusInternalServerError)");
    w.line("return");
    w.close("}");
    w.blank();
    w.line(format!(
        "tenant := chi.URLParam(req, {})",
        go_string_literal(tenant_param)
    ));
    w.line("ret, err := x.List(db, tenant)");
    w.open("if err != nil {");
    w.line("http.Error(w, err.Error(), http.StatusInternalServerError)");
    w.line("return");
    w.close("}");
    w.blank();
    w.line("jsonData, err := json.Marshal(ret)");
    w.open("if err != nil {");
    w.line("http.Error(w, err.Error(), http.StatusInternalServerError)");
    w.line("return");
    w.close("}");
    w.blank();
    w.line("w.Header().Set(\"Content-Type\", \"application/json\")");
    w.line("w.Write(jsonData)");
    w.close("}");
}
