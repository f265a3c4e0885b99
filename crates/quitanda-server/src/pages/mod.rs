//! HTML rendering. Pages are small enough that a template engine would be
//! more machinery than markup; each page builds its body and hands it to the
//! shared layout shell. All user-supplied text goes through [`escape`].

use axum::response::Html;

use crate::auth::session::FlashBag;
use crate::models::Item;

pub fn login(flash: &FlashBag, username: Option<&str>) -> Html<String> {
    let body = r#"<h1>Login</h1>
<form method="post" action="/login">
  <label>Usuário <input type="text" name="username"></label>
  <label>Senha <input type="password" name="password"></label>
  <button type="submit">Entrar</button>
</form>
<p>Não tem conta? <a href="/register">Cadastre-se</a></p>"#;
    layout("Login", username, flash, body)
}

pub fn register(flash: &FlashBag, username: Option<&str>) -> Html<String> {
    let body = r#"<h1>Cadastro</h1>
<form method="post" action="/register">
  <label>Usuário <input type="text" name="username"></label>
  <label>Senha <input type="password" name="password"></label>
  <button type="submit">Cadastrar</button>
</form>
<p>Já tem conta? <a href="/login">Faça login</a></p>"#;
    layout("Cadastro", username, flash, body)
}

pub fn add_item(flash: &FlashBag, username: Option<&str>) -> Html<String> {
    let body = r#"<h1>Adicionar item</h1>
<form method="post" action="/items">
  <label>Nome <input type="text" name="nome"></label>
  <label>Descrição <input type="text" name="descricao"></label>
  <label>Preço <input type="text" name="preco" placeholder="0,00"></label>
  <button type="submit">Adicionar</button>
</form>
<p><a href="/list_items">Voltar para a lista</a></p>"#;
    layout("Adicionar item", username, flash, body)
}

pub fn list_items(flash: &FlashBag, username: Option<&str>, items: &[Item]) -> Html<String> {
    let mut body = String::from("<h1>Itens</h1>\n");
    if items.is_empty() {
        body.push_str("<p>Nenhum item cadastrado.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Nome</th><th>Descrição</th><th>Preço</th></tr>\n");
        for item in items {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>R$ {:.2}</td></tr>\n",
                escape(&item.name),
                escape(&item.description),
                item.price,
            ));
        }
        body.push_str("</table>\n");
    }
    body.push_str("<p><a href=\"/items\">Adicionar item</a></p>");
    layout("Itens", username, flash, &body)
}

pub fn error_page() -> Html<String> {
    layout(
        "Erro",
        None,
        &FlashBag::default(),
        "<h1>Erro interno no servidor.</h1>\n<p><a href=\"/\">Voltar</a></p>",
    )
}

fn layout(title: &str, username: Option<&str>, flash: &FlashBag, body: &str) -> Html<String> {
    let mut notices = String::new();
    for (class, messages) in [
        ("success", &flash.success),
        ("error", &flash.error),
        ("warning", &flash.warning),
    ] {
        for message in messages {
            notices.push_str(&format!(
                "<div class=\"flash {class}\">{}</div>\n",
                escape(message)
            ));
        }
    }

    let nav = match username {
        Some(name) => format!(
            "<span>Olá, {}</span> <a href=\"/list_items\">Itens</a> <a href=\"/logout\">Sair</a>",
            escape(name)
        ),
        None => String::from("<a href=\"/login\">Entrar</a> <a href=\"/register\">Cadastrar</a>"),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<title>{title} — Quitanda</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<nav>{nav}</nav>
{notices}{body}
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
