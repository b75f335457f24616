// Server-rendered HTML. Every user-controlled string goes through `escape`.

use crate::models::{Device, NetworkInterface, User};
use std::fmt::Write;

pub fn escape(s: &str) -> String {
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

fn layout(title: &str, nav: &str, flash: Option<&str>, body: &str) -> String {
    let flash = flash
        .map(|m| format!("<p class=\"flash\">{}</p>\n", escape(m)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{nav}<h1>{title}</h1>\n{flash}{body}</body>\n</html>\n",
        title = escape(title),
    )
}

fn nav(user: &User, admin_panel: bool) -> String {
    let mut out = format!("<nav>Signed in as {} | <a href=\"/\">Devices</a>", escape(&user.username));
    if admin_panel && user.capabilities.is_admin {
        out.push_str(" | <a href=\"/admin\">Users</a>");
    }
    out.push_str(" | <a href=\"/logout\">Log out</a></nav>\n");
    out
}

pub fn login_page(message: Option<&str>) -> String {
    let body = "<form method=\"post\" action=\"/login\">\n\
         <label>Username <input name=\"username\" autocomplete=\"username\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\" autocomplete=\"current-password\"></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n";
    layout("Login", "", message, body)
}

pub struct IndexView<'a> {
    pub user: &'a User,
    pub devices: &'a [Device],
    pub interfaces: &'a [NetworkInterface],
    pub flash: Option<&'a str>,
    pub admin_panel: bool,
}

pub fn index_page(view: &IndexView<'_>) -> String {
    let caps = view.user.capabilities;
    let mut body = String::new();

    body.push_str("<h2>Devices</h2>\n<table>\n<tr><th>Name</th><th>MAC</th><th>Interface</th><th></th></tr>\n");
    for d in view.devices {
        let action = if caps.can_send_wol {
            format!("<a href=\"/wake/{}\">Wake</a>", d.id)
        } else {
            String::new()
        };
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&d.name),
            escape(&d.mac),
            escape(&d.interface),
            action
        );
    }
    body.push_str("</table>\n");

    body.push_str("<h2>Interfaces</h2>\n<table>\n<tr><th>Interface</th><th>IPv4</th></tr>\n");
    for i in view.interfaces {
        let ip = i.ipv4.map(|ip| ip.to_string()).unwrap_or_else(|| "-".into());
        let _ = writeln!(body, "<tr><td>{}</td><td>{}</td></tr>", escape(&i.name), ip);
    }
    body.push_str("</table>\n");

    if caps.can_add_devices {
        body.push_str("<h2>Add device</h2>\n<form method=\"post\" action=\"/add\">\n");
        body.push_str("<label>Name <input name=\"name\"></label>\n");
        body.push_str("<label>MAC <input name=\"mac\" placeholder=\"AA:BB:CC:DD:EE:FF\"></label>\n");
        body.push_str("<label>Interface <select name=\"interface\">\n");
        for i in view.interfaces {
            let _ = writeln!(
                body,
                "<option value=\"{0}\">{0}</option>",
                escape(&i.name)
            );
        }
        body.push_str("</select></label>\n<button type=\"submit\">Add</button>\n</form>\n");
    }

    layout(
        "Wake-on-LAN",
        &nav(view.user, view.admin_panel),
        view.flash,
        &body,
    )
}

pub fn admin_page(user: &User, users: &[User], flash: Option<&str>) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let mut body = String::new();
    body.push_str("<table>\n<tr><th>Username</th><th>Admin</th><th>Add devices</th><th>Send WoL</th></tr>\n");
    for u in users {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&u.username),
            yes_no(u.capabilities.is_admin),
            yes_no(u.capabilities.can_add_devices),
            yes_no(u.capabilities.can_send_wol)
        );
    }
    body.push_str("</table>\n");
    body.push_str(
        "<h2>Create user</h2>\n<form method=\"post\" action=\"/admin\">\n\
         <label>Username <input name=\"username\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\" autocomplete=\"new-password\"></label>\n\
         <label><input type=\"checkbox\" name=\"is_admin\"> Admin</label>\n\
         <label><input type=\"checkbox\" name=\"can_add_devices\"> Can add devices</label>\n\
         <label><input type=\"checkbox\" name=\"can_send_wol\"> Can send WoL</label>\n\
         <button type=\"submit\">Create</button>\n\
         </form>\n",
    );
    layout("Users", &nav(user, true), flash, &body)
}
