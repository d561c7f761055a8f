//! GraphQL Query 根

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use super::error::GraphqlResultExt;
use super::request_scope;
use super::types::{GqlConversation, GqlConversationDetail, GqlCourse, GqlCourseDetail, GqlLlmModel, GqlUser};
use crate::application::{
    GetConversation, GetCourse, GetCurrentUser, ListConversations, ListCourses, ListLlmModels,
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// 当前用户资料
    async fn me(&self, ctx: &Context<'_>) -> Result<GqlUser> {
        let (state, user) = request_scope(ctx)?;
        let record = state
            .get_current_user_handler
            .handle(GetCurrentUser {
                user_id: user.user_id.clone(),
            })
            .await
            .gql()?;
        Ok(record.into())
    }

    /// 当前用户的课程
    async fn courses(&self, ctx: &Context<'_>) -> Result<Vec<GqlCourse>> {
        let (state, user) = request_scope(ctx)?;
        let courses = state
            .list_courses_handler
            .handle(ListCourses {
                user_id: user.user_id.clone(),
            })
            .await
            .gql()?;
        Ok(courses.into_iter().map(Into::into).collect())
    }

    /// 课程及其章节
    async fn course(&self, ctx: &Context<'_>, id: Uuid) -> Result<GqlCourseDetail> {
        let (state, user) = request_scope(ctx)?;
        let detail = state
            .get_course_handler
            .handle(GetCourse {
                user_id: user.user_id.clone(),
                course_id: id,
            })
            .await
            .gql()?;
        Ok(detail.into())
    }

    /// 当前用户的对话，最近更新的在前
    async fn conversations(&self, ctx: &Context<'_>) -> Result<Vec<GqlConversation>> {
        let (state, user) = request_scope(ctx)?;
        let conversations = state
            .list_conversations_handler
            .handle(ListConversations {
                user_id: user.user_id.clone(),
            })
            .await
            .gql()?;
        Ok(conversations.into_iter().map(Into::into).collect())
    }

    async fn conversation(&self, ctx: &Context<'_>, id: Uuid) -> Result<GqlConversationDetail> {
        let (state, user) = request_scope(ctx)?;
        let detail = state
            .get_conversation_handler
            .handle(GetConversation {
                user_id: user.user_id.clone(),
                conversation_id: id,
            })
            .await
            .gql()?;
        Ok(detail.into())
    }

    /// 启用中的 LLM 模型
    async fn llm_models(&self, ctx: &Context<'_>) -> Result<Vec<GqlLlmModel>> {
        let (state, _) = request_scope(ctx)?;
        let models = state.list_models_handler.handle(ListLlmModels).await.gql()?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
