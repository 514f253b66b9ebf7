//! Tests for SELECT compilation: projection, sources, joins and filters.

mod common;
use common::*;

use std::sync::Arc;

use oxide_query::{
    Builder, FullTextMode, FullTextOptions, JoinType, MySqlGrammar, SqlValue, SubQuery,
};

// ===================================================================
// Projection and sources
// ===================================================================

#[test]
fn select_columns_with_alias() {
    let mut q = Builder::table("users");
    q.select(["id", "name as n"]).where_eq("active", true);
    q.where_op("age", ">=", 18).unwrap();

    assert_eq!(
        q.to_sql(),
        "select `id`, `name` as `n` from `users` where `active` = ? and `age` >= ?"
    );
    assert_eq!(q.bindings(), vec![SqlValue::Bool(true), int(18)]);
}

#[test]
fn select_distinct() {
    let mut q = Builder::table("users");
    q.distinct().select(["role"]);
    assert_eq!(q.to_sql(), "select distinct `role` from `users`");
}

#[test]
fn select_sub_query_column() {
    let mut q = Builder::table("users");
    q.select(["id"]).select_sub(
        SubQuery::callback(|s: &mut Builder| {
            s.from("posts")
                .select_raw("count(*)", Vec::<i64>::new())
                .where_column("posts.user_id", "=", "users.id");
        }),
        "posts_count",
    );
    assert_eq!(
        q.to_sql(),
        "select `id`, (select count(*) from `posts` where `posts`.`user_id` = `users`.`id`) \
         as `posts_count` from `users`"
    );
}

#[test]
fn from_sub_query_binds_before_where() {
    let mut inner = Builder::table("orders");
    inner.where_eq("paid", true);

    let mut q = Builder::new();
    q.from_sub(inner, "o");
    q.where_op("o.total", ">", 10).unwrap();

    assert_eq!(
        q.to_sql(),
        "select * from (select * from `orders` where `paid` = ?) as `o` where `o`.`total` > ?"
    );
    assert_eq!(q.bindings(), vec![SqlValue::Bool(true), int(10)]);
}

#[test]
fn from_raw_with_bindings() {
    let mut q = Builder::new();
    q.from_raw("generate_series(1, ?) as n", [10]);
    assert_eq!(q.to_sql(), "select * from generate_series(1, ?) as n");
    assert_eq!(q.bindings(), vec![int(10)]);
}

#[test]
fn table_prefix_applies_to_aliases() {
    let grammar = MySqlGrammar::new().with_table_prefix("wp_");
    let mut q = Builder::with_grammar(Arc::new(grammar));
    q.from("posts as p").where_eq("p.id", 1);
    assert_eq!(
        q.to_sql(),
        "select * from `wp_posts` as `wp_p` where `wp_p`.`id` = ?"
    );
}

// ===================================================================
// Joins
// ===================================================================

#[test]
fn join_kinds() {
    let mut q = Builder::table("users");
    q.join("contacts", "users.id", "=", "contacts.user_id")
        .left_join("orders", "users.id", "=", "orders.user_id")
        .cross_join("regions");

    assert_eq!(
        q.to_sql(),
        "select * from `users` \
         inner join `contacts` on `users`.`id` = `contacts`.`user_id` \
         left join `orders` on `users`.`id` = `orders`.`user_id` \
         cross join `regions`"
    );
}

#[test]
fn join_where_binds_value() {
    let mut q = Builder::table("users");
    q.join_where("contacts", "contacts.kind", "=", "email", JoinType::Inner)
        .unwrap()
        .where_eq("users.id", 5);

    assert_eq!(
        q.to_sql(),
        "select * from `users` inner join `contacts` on `contacts`.`kind` = ? where `users`.`id` = ?"
    );
    assert_eq!(q.bindings(), vec![text("email"), int(5)]);
}

#[test]
fn join_bindings_precede_where_bindings() {
    let mut q = Builder::table("users");
    q.where_eq("users.id", 5)
        .join_with("contacts", JoinType::Inner, |j| {
            j.on("users.id", "=", "contacts.user_id")
                .where_eq("contacts.kind", "email");
        });

    assert_eq!(
        q.to_sql(),
        "select * from `users` inner join `contacts` on `users`.`id` = `contacts`.`user_id` \
         and `contacts`.`kind` = ? where `users`.`id` = ?"
    );
    assert_eq!(q.bindings(), vec![text("email"), int(5)]);
}

#[test]
fn nested_group_inside_join_clause() {
    let mut q = Builder::table("users");
    q.join_with("posts", JoinType::Inner, |j| {
        j.on("users.id", "=", "posts.user_id").where_nested(|n| {
            n.where_eq("posts.a", 1).or_where_eq("posts.b", 2);
        });
    })
    .where_eq("users.id", 3);

    assert_eq!(
        q.to_sql(),
        "select * from `users` inner join `posts` on `users`.`id` = `posts`.`user_id` \
         and (`posts`.`a` = ? or `posts`.`b` = ?) where `users`.`id` = ?"
    );
    assert_eq!(q.bindings(), vec![int(1), int(2), int(3)]);
    assert_aligned(&q);
}

#[test]
fn nested_join_is_parenthesized() {
    let mut q = Builder::table("users");
    q.join_with("contacts", JoinType::Left, |j| {
        j.on("users.id", "=", "contacts.user_id");
        j.join("phones", "contacts.id", "=", "phones.contact_id");
    });

    assert_eq!(
        q.to_sql(),
        "select * from `users` left join (`contacts` inner join `phones` on \
         `contacts`.`id` = `phones`.`contact_id`) on `users`.`id` = `contacts`.`user_id`"
    );
}

#[test]
fn join_sub_query() {
    let mut latest = Builder::table("posts");
    latest.select(["user_id"]).where_eq("published", true);

    let mut q = Builder::table("users");
    q.join_sub(latest, "latest", "users.id", "=", "latest.user_id", JoinType::Inner)
        .where_eq("users.active", 1);

    assert_eq!(
        q.to_sql(),
        "select * from `users` inner join (select `user_id` from `posts` where `published` = ?) \
         as `latest` on `users`.`id` = `latest`.`user_id` where `users`.`active` = ?"
    );
    assert_eq!(q.bindings(), vec![SqlValue::Bool(true), int(1)]);
}

// ===================================================================
// Where family
// ===================================================================

#[test]
fn two_and_three_argument_forms_match() {
    let mut two = Builder::table("users");
    two.where_eq("name", "Ada");
    let mut three = Builder::table("users");
    three.where_op("name", "=", "Ada").unwrap();

    assert_eq!(two.build(), three.build());
}

#[test]
fn where_in_and_not_in() {
    let mut q = Builder::table("users");
    q.where_in("id", [1, 2, 3])
        .where_not_in("status", ["banned"])
        .where_in("role", Vec::<&str>::new());

    assert_eq!(
        q.to_sql(),
        "select * from `users` where `id` in (?, ?, ?) and `status` not in (?) and 0 = 1"
    );
    assert_eq!(q.bindings().len(), 4);
}

#[test]
fn where_in_sub_query() {
    let mut q = Builder::table("users");
    q.where_in_sub(
        "id",
        SubQuery::callback(|s: &mut Builder| {
            s.from("orders").select(["user_id"]);
            s.where_op("total", ">", 100).unwrap();
        }),
    );

    assert_eq!(
        q.to_sql(),
        "select * from `users` where `id` in (select `user_id` from `orders` where `total` > ?)"
    );
    assert_eq!(q.bindings(), vec![int(100)]);
}

#[test]
fn where_integer_in_raw_inlines() {
    let mut q = Builder::table("users");
    q.where_integer_in_raw("id", [1, 2])
        .where_integer_not_in_raw("id", [3]);

    assert_eq!(
        q.to_sql(),
        "select * from `users` where `id` in (1, 2) and `id` not in (3)"
    );
    assert!(q.bindings().is_empty());
}

#[test]
fn where_null_on_plain_and_json_columns() {
    let mut q = Builder::table("users");
    q.where_null("deleted_at").where_not_null("meta->tag");

    assert_eq!(
        q.to_sql(),
        "select * from `users` where `deleted_at` is null and \
         (json_extract(`meta`, '$.\"tag\"') is not null AND \
         json_type(json_extract(`meta`, '$.\"tag\"')) != 'NULL')"
    );
}

#[test]
fn where_between_variants() {
    let mut q = Builder::table("users");
    q.where_between("age", 18, 65)
        .or_where_not_between("score", 1, 5)
        .where_between_columns("created_at", "starts_at", "ends_at");

    assert_eq!(
        q.to_sql(),
        "select * from `users` where `age` between ? and ? or `score` not between ? and ? \
         and `created_at` between `starts_at` and `ends_at`"
    );
    assert_eq!(q.bindings(), vec![int(18), int(65), int(1), int(5)]);
}

#[test]
fn where_date_parts() {
    let mut q = Builder::table("posts");
    q.where_date("created_at", "=", "2024-01-01").unwrap();
    q.where_year("created_at", ">", 2020).unwrap();

    assert_eq!(
        q.to_sql(),
        "select * from `posts` where date(`created_at`) = ? and year(`created_at`) > ?"
    );
}

#[test]
fn nested_groups_keep_binding_order() {
    let mut q = Builder::table("users");
    q.where_eq("active", true)
        .where_nested(|n| {
            n.where_eq("role", "admin").or_where_eq("role", "owner");
        })
        .or_where_nested(|n| {
            n.where_op("age", ">", 60).unwrap();
        });

    assert_eq!(
        q.to_sql(),
        "select * from `users` where `active` = ? and (`role` = ? or `role` = ?) or (`age` > ?)"
    );
    assert_eq!(
        q.bindings(),
        vec![SqlValue::Bool(true), text("admin"), text("owner"), int(60)]
    );
}

#[test]
fn where_all_groups_equalities() {
    let mut q = Builder::table("users");
    q.where_all([("name", "Ada"), ("role", "admin")]);
    assert_eq!(
        q.to_sql(),
        "select * from `users` where (`name` = ? and `role` = ?)"
    );
}

#[test]
fn where_column_with_unknown_operator() {
    let mut q = Builder::table("users");
    q.where_column("first_name", "last_name", "ignored");
    assert_eq!(
        q.to_sql(),
        "select * from `users` where `first_name` = `last_name`"
    );
}

#[test]
fn where_exists_and_sub() {
    let mut q = Builder::table("users");
    q.where_exists(SubQuery::callback(|s: &mut Builder| {
        s.from("orders").where_column("orders.user_id", "=", "users.id");
    }))
    .where_sub(
        "score",
        ">",
        SubQuery::raw("select avg(score) from users"),
    );

    assert_eq!(
        q.to_sql(),
        "select * from `users` where exists (select * from `orders` where \
         `orders`.`user_id` = `users`.`id`) and `score` > (select avg(score) from users)"
    );
}

#[test]
fn where_raw_and_bitwise() {
    let mut q = Builder::table("users");
    q.where_raw("lower(name) = ?", ["ada"]);
    q.where_op("flags", "&", 4).unwrap();

    assert_eq!(
        q.to_sql(),
        "select * from `users` where lower(name) = ? and `flags` & ?"
    );
    assert_eq!(q.bindings(), vec![text("ada"), int(4)]);
}

#[test]
fn where_row_values() {
    let mut q = Builder::table("users");
    q.where_row_values(["a", "b"], "=", [1, 2]).unwrap();
    assert_eq!(q.to_sql(), "select * from `users` where (`a`, `b`) = (?, ?)");
}

#[test]
fn where_full_text_modes() {
    let mut q = Builder::table("posts");
    q.where_full_text(["title", "body"], "rust", FullTextOptions::default())
        .or_where_full_text(
            ["title"],
            "+async -sync",
            FullTextOptions {
                mode: FullTextMode::Boolean,
                expanded: false,
            },
        );

    assert_eq!(
        q.to_sql(),
        "select * from `posts` where match (`title`, `body`) against (? in natural language mode) \
         or match (`title`) against (? in boolean mode)"
    );
}

#[test]
fn where_json_filters() {
    let mut q = Builder::table("users");
    q.where_eq("options->language", "en")
        .where_eq("options->enabled", true)
        .where_json_contains("options->tags", "rust")
        .where_json_doesnt_contain("options->tags", "php");
    q.where_json_length("options->tags", ">", 1).unwrap();

    assert_eq!(
        q.to_sql(),
        "select * from `users` where json_unquote(json_extract(`options`, '$.\"language\"')) = ? \
         and json_extract(`options`, '$.\"enabled\"') = true \
         and json_contains(`options`, ?, '$.\"tags\"') \
         and not json_contains(`options`, ?, '$.\"tags\"') \
         and json_length(`options`, '$.\"tags\"') > ?"
    );
    assert_eq!(q.bindings().len(), 4);
}

// ===================================================================
// Grouping, ordering and locks
// ===================================================================

#[test]
fn group_by_and_having() {
    let mut q = Builder::table("users");
    q.select(["role"])
        .select_raw("count(*) as total", Vec::<i64>::new())
        .group_by(["role"]);
    q.having_op("total", ">", 3).unwrap();
    q.having_raw("sum(score) > ?", [10]);

    assert_eq!(
        q.to_sql(),
        "select `role`, count(*) as total from `users` group by `role` \
         having `total` > ? and sum(score) > ?"
    );
    assert_eq!(q.bindings(), vec![int(3), int(10)]);
}

#[test]
fn orders_limit_and_lock() {
    let mut q = Builder::table("users");
    q.order_by("name", "DESC").unwrap();
    q.order_by_raw("field(id, ?)", [3])
        .in_random_order("")
        .limit(10)
        .offset(20)
        .lock_for_update();

    assert_eq!(
        q.to_sql(),
        "select * from `users` order by `name` desc, field(id, ?), RAND() \
         limit 10 offset 20 for update"
    );
    assert_eq!(q.bindings(), vec![int(3)]);
}

#[test]
fn shared_lock() {
    let mut q = Builder::table("users");
    q.shared_lock();
    assert_eq!(q.to_sql(), "select * from `users` lock in share mode");
}

#[test]
fn reorder_drops_order_bindings() {
    let mut q = Builder::table("users");
    q.order_by_raw("field(id, ?)", [3]).reorder().latest("created_at");
    assert_eq!(q.to_sql(), "select * from `users` order by `created_at` desc");
    assert!(q.bindings().is_empty());
}

#[test]
fn to_full_sql_inlines_bindings() {
    let mut q = Builder::table("users");
    q.where_eq("name", "O'Brien").where_eq("id", 3);
    assert_eq!(
        q.to_full_sql(),
        "select * from `users` where `name` = 'O''Brien' and `id` = 3"
    );
}
