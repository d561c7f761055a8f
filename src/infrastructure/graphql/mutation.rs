//! GraphQL Mutation 根

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use super::error::GraphqlResultExt;
use super::request_scope;
use super::types::{
    CreateCourseInput, GqlConversation, GqlCourse, GqlLearningLevels, GqlMessage,
    UpdateCourseInput,
};
use crate::application::{
    AddMessage, CreateConversation, CreateCourse, DeleteConversation, DeleteCourse,
    ProposeLearningLevels, RenameConversation, UpdateCourse,
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_course(&self, ctx: &Context<'_>, input: CreateCourseInput) -> Result<GqlCourse> {
        let (state, user) = request_scope(ctx)?;
        let course = state
            .create_course_handler
            .handle(CreateCourse {
                user_id: user.user_id.clone(),
                conversation_id: input.conversation_id,
                title: input.title,
                description: input.description,
                learning_goal: input.learning_goal,
                level: input.level,
            })
            .await
            .gql()?;
        Ok(course.into())
    }

    async fn update_course(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateCourseInput,
    ) -> Result<GqlCourse> {
        let (state, user) = request_scope(ctx)?;
        let course = state
            .update_course_handler
            .handle(UpdateCourse {
                user_id: user.user_id.clone(),
                course_id: id,
                title: input.title,
                description: input.description,
                level: input.level,
            })
            .await
            .gql()?;
        Ok(course.into())
    }

    /// 删除课程（级联删除章节与测验），返回被删除的 id
    async fn delete_course(&self, ctx: &Context<'_>, id: Uuid) -> Result<Uuid> {
        let (state, user) = request_scope(ctx)?;
        state
            .delete_course_handler
            .handle(DeleteCourse {
                user_id: user.user_id.clone(),
                course_id: id,
            })
            .await
            .gql()?;
        Ok(id)
    }

    async fn create_conversation(
        &self,
        ctx: &Context<'_>,
        title: String,
        llm_model_id: Option<Uuid>,
    ) -> Result<GqlConversation> {
        let (state, user) = request_scope(ctx)?;
        let conversation = state
            .create_conversation_handler
            .handle(CreateConversation {
                user_id: user.user_id.clone(),
                title,
                llm_model_id,
            })
            .await
            .gql()?;
        Ok(conversation.into())
    }

    async fn rename_conversation(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        title: String,
    ) -> Result<GqlConversation> {
        let (state, user) = request_scope(ctx)?;
        let conversation = state
            .rename_conversation_handler
            .handle(RenameConversation {
                user_id: user.user_id.clone(),
                conversation_id: id,
                title,
            })
            .await
            .gql()?;
        Ok(conversation.into())
    }

    async fn delete_conversation(&self, ctx: &Context<'_>, id: Uuid) -> Result<Uuid> {
        let (state, user) = request_scope(ctx)?;
        state
            .delete_conversation_handler
            .handle(DeleteConversation {
                user_id: user.user_id.clone(),
                conversation_id: id,
            })
            .await
            .gql()?;
        Ok(id)
    }

    async fn add_message(
        &self,
        ctx: &Context<'_>,
        conversation_id: Uuid,
        role: String,
        content: String,
    ) -> Result<GqlMessage> {
        let (state, user) = request_scope(ctx)?;
        let message = state
            .add_message_handler
            .handle(AddMessage {
                user_id: user.user_id.clone(),
                conversation_id,
                role,
                content,
            })
            .await
            .gql()?;
        Ok(message.into())
    }

    /// 提交学习目标，返回 LLM 建议的学习级别
    async fn propose_learning_levels(
        &self,
        ctx: &Context<'_>,
        goal: String,
        model: Option<String>,
    ) -> Result<GqlLearningLevels> {
        let (state, user) = request_scope(ctx)?;
        let response = state
            .propose_levels_handler
            .handle(ProposeLearningLevels {
                user_id: user.user_id.clone(),
                goal,
                model,
            })
            .await
            .gql()?;
        Ok(response.into())
    }
}
