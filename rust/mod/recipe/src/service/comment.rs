use homecook_core::{Claims, now_rfc3339};
use homecook_sql::{Row, Value};

use crate::model::{CommentView, CreateComment, UpdateComment};
use crate::service::{RecipeError, RecipeService};

const COMMENT_SELECT: &str = "SELECT c.id, c.content, c.created_at, c.user_id, u.full_name AS user_name,
        c.recipe_id, c.parent_comment_id
    FROM comments c JOIN users u ON u.id = c.user_id";

fn comment_from_row(row: &Row) -> Result<CommentView, RecipeError> {
    Ok(CommentView {
        id: row.int("id")?,
        content: row.text("content")?,
        created_at: row.text("created_at")?,
        user_id: row.text("user_id")?,
        user_name: row.text("user_name")?,
        recipe_id: row.int("recipe_id")?,
        parent_comment_id: row.opt_int("parent_comment_id"),
    })
}

fn validate_content(content: &str) -> Result<String, RecipeError> {
    let content = content.trim();
    if content.is_empty() || content.chars().count() > 500 {
        return Err(RecipeError::Validation(
            "Comment must be between 1 and 500 characters.".into(),
        ));
    }
    Ok(content.to_string())
}

fn not_found(id: i64) -> RecipeError {
    RecipeError::NotFound(format!("Comment with ID {} not found.", id))
}

impl RecipeService {
    fn query_comments(&self, filter: &str, params: &[Value]) -> Result<Vec<CommentView>, RecipeError> {
        let sql = format!("{}{} ORDER BY c.created_at, c.id", COMMENT_SELECT, filter);
        self.sql
            .query(&sql, params)?
            .iter()
            .map(comment_from_row)
            .collect()
    }

    pub(crate) fn comments_of(&self, recipe_id: i64) -> Result<Vec<CommentView>, RecipeError> {
        self.query_comments(" WHERE c.recipe_id = ?1", &[recipe_id.into()])
    }

    pub fn list_comments(&self) -> Result<Vec<CommentView>, RecipeError> {
        self.query_comments("", &[])
    }

    pub fn get_comment(&self, id: i64) -> Result<CommentView, RecipeError> {
        self.query_comments(" WHERE c.id = ?1", &[id.into()])?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(id))
    }

    /// Direct replies to a comment, oldest first.
    pub fn list_replies(&self, comment_id: i64) -> Result<Vec<CommentView>, RecipeError> {
        self.get_comment(comment_id)?;
        self.query_comments(" WHERE c.parent_comment_id = ?1", &[comment_id.into()])
    }

    /// Post a comment, or a reply when `parent_comment_id` is set. A reply
    /// must be on the same recipe as its parent.
    pub fn create_comment(&self, author: &Claims, input: CreateComment) -> Result<CommentView, RecipeError> {
        let content = validate_content(&input.content)?;
        self.require_author(author)?;
        self.require_recipe(input.recipe_id)?;

        if let Some(parent_id) = input.parent_comment_id {
            let parent = self.get_comment(parent_id).map_err(|e| match e {
                RecipeError::NotFound(_) => RecipeError::NotFound("Parent comment not found.".into()),
                other => other,
            })?;
            if parent.recipe_id != input.recipe_id {
                return Err(RecipeError::Validation(
                    "A reply must belong to the same recipe as its parent comment.".into(),
                ));
            }
        }

        let id = self.sql.insert(
            "INSERT INTO comments (content, created_at, user_id, recipe_id, parent_comment_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            &[
                content.into(),
                now_rfc3339().into(),
                author.sub.as_str().into(),
                input.recipe_id.into(),
                input.parent_comment_id.into(),
            ],
        )?;
        tracing::debug!(comment_id = id, recipe_id = input.recipe_id, "created comment");
        self.get_comment(id)
    }

    /// Edit a comment's text. Only the author may do so.
    pub fn update_comment(
        &self,
        id: i64,
        input: UpdateComment,
        caller: &Claims,
    ) -> Result<CommentView, RecipeError> {
        let comment = self.get_comment(id)?;
        if comment.user_id != caller.sub {
            return Err(RecipeError::Forbidden(
                "You can only edit your own comments.".into(),
            ));
        }
        let content = validate_content(&input.content)?;
        self.sql.exec(
            "UPDATE comments SET content = ?1 WHERE id = ?2",
            &[content.into(), id.into()],
        )?;
        self.get_comment(id)
    }

    /// Delete a comment and its replies. Allowed for the author and for
    /// administrators.
    pub fn delete_comment(&self, id: i64, caller: &Claims) -> Result<(), RecipeError> {
        let comment = self.get_comment(id)?;
        if !caller.is_self_or_admin(&comment.user_id) {
            return Err(RecipeError::Forbidden(
                "You are not authorized to delete this comment.".into(),
            ));
        }
        self.sql.exec("DELETE FROM comments WHERE id = ?1", &[id.into()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use homecook_core::ROLE_SUPER_ADMIN;

    use super::*;
    use crate::service::testing::harness;

    fn comment(recipe_id: i64, content: &str, parent: Option<i64>) -> CreateComment {
        CreateComment {
            recipe_id,
            content: content.into(),
            parent_comment_id: parent,
        }
    }

    #[test]
    fn threaded_comments() {
        let h = harness();
        let alice = h.user("alice@example.com", &[]);
        let bob = h.user("bob@example.com", &[]);
        let r = h.recipe(&alice, "Garlic Pasta");

        let top = h.svc.create_comment(&bob, comment(r, "Looks great", None)).unwrap();
        assert_eq!(top.parent_comment_id, None);
        assert_eq!(top.user_name, "Test Cook");

        let reply = h.svc.create_comment(&alice, comment(r, "Thanks!", Some(top.id))).unwrap();
        assert_eq!(reply.parent_comment_id, Some(top.id));

        let replies = h.svc.list_replies(top.id).unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id, reply.id);
        assert!(h.svc.list_replies(reply.id).unwrap().is_empty());
        assert!(matches!(h.svc.list_replies(9999), Err(RecipeError::NotFound(_))));

        assert_eq!(h.svc.get_recipe(r).unwrap().comments.len(), 2);
    }

    #[test]
    fn create_checks_references() {
        let h = harness();
        let alice = h.user("alice@example.com", &[]);
        let r1 = h.recipe(&alice, "Garlic Pasta");
        let r2 = h.recipe(&alice, "Tomato Soup");
        let c1 = h.svc.create_comment(&alice, comment(r1, "first", None)).unwrap();

        assert!(matches!(
            h.svc.create_comment(&alice, comment(9999, "hi", None)),
            Err(RecipeError::NotFound(_))
        ));
        assert!(matches!(
            h.svc.create_comment(&alice, comment(r1, "hi", Some(9999))),
            Err(RecipeError::NotFound(_))
        ));
        assert!(matches!(
            h.svc.create_comment(&alice, comment(r2, "hi", Some(c1.id))),
            Err(RecipeError::Validation(_))
        ));
        assert!(matches!(
            h.svc.create_comment(&alice, comment(r1, "   ", None)),
            Err(RecipeError::Validation(_))
        ));
        assert!(matches!(
            h.svc.create_comment(&alice, comment(r1, &"x".repeat(501), None)),
            Err(RecipeError::Validation(_))
        ));
    }

    #[test]
    fn only_author_edits() {
        let h = harness();
        let alice = h.user("alice@example.com", &[]);
        let root = h.user("root@example.com", &[ROLE_SUPER_ADMIN]);
        let r = h.recipe(&alice, "Garlic Pasta");
        let c = h.svc.create_comment(&alice, comment(r, "first", None)).unwrap();

        let edit = UpdateComment { content: "edited".into() };
        assert!(matches!(
            h.svc.update_comment(c.id, edit.clone(), &root),
            Err(RecipeError::Forbidden(_))
        ));
        assert_eq!(h.svc.update_comment(c.id, edit, &alice).unwrap().content, "edited");
    }

    #[test]
    fn delete_cascades_to_replies() {
        let h = harness();
        let alice = h.user("alice@example.com", &[]);
        let bob = h.user("bob@example.com", &[]);
        let root = h.user("root@example.com", &[ROLE_SUPER_ADMIN]);
        let r = h.recipe(&alice, "Garlic Pasta");
        let top = h.svc.create_comment(&alice, comment(r, "top", None)).unwrap();
        h.svc.create_comment(&bob, comment(r, "reply", Some(top.id))).unwrap();

        assert!(matches!(h.svc.delete_comment(top.id, &bob), Err(RecipeError::Forbidden(_))));
        h.svc.delete_comment(top.id, &root).unwrap();
        assert!(h.svc.list_comments().unwrap().is_empty());
    }
}
